//! Index file header

use bytes::{Buf, BufMut};

use crate::error::{CorpusError, Result};

use super::{DType, HEADER_SIZE, MAGIC, VERSION};

/// Fixed-layout record at the start of every index file
///
/// Written once by the writer at finalize, read once by the reader at open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Format version
    pub version: u16,
    /// Token width of the paired data file
    pub dtype: DType,
    /// Number of documents (entries in each index array)
    pub document_count: u64,
    /// CRC32 of the entire data file
    pub data_crc32: u32,
}

impl Header {
    /// Header for the current format version
    pub fn new(dtype: DType, document_count: u64, data_crc32: u32) -> Self {
        Self {
            version: VERSION,
            dtype,
            document_count,
            data_crc32,
        }
    }

    /// Append the 24-byte encoding to `buf`
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(MAGIC);
        buf.put_u16_le(self.version);
        buf.put_u8(self.dtype.code());
        buf.put_u8(0); // Reserved
        buf.put_u64_le(self.document_count);
        buf.put_u32_le(self.data_crc32);
        buf.put_u32_le(0); // Reserved
    }

    /// Parse and validate a header from the front of `bytes`
    ///
    /// Checks happen in layout order: length, magic, version, width code.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(CorpusError::Format(format!(
                "Index file too short for header: {} bytes, need {}",
                bytes.len(),
                HEADER_SIZE
            )));
        }

        let mut buf = &bytes[..HEADER_SIZE];

        let magic = &buf[0..4];
        if magic != MAGIC {
            return Err(CorpusError::Format(format!(
                "Invalid index magic: expected {:?}, got {:?}",
                MAGIC, magic
            )));
        }
        buf.advance(4);

        let version = buf.get_u16_le();
        if version != VERSION {
            return Err(CorpusError::UnsupportedVersion {
                found: version,
                supported: VERSION,
            });
        }

        let dtype = DType::from_code(buf.get_u8())?;
        buf.advance(1);
        let document_count = buf.get_u64_le();
        let data_crc32 = buf.get_u32_le();

        Ok(Self {
            version,
            dtype,
            document_count,
            data_crc32,
        })
    }
}
