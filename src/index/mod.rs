//! Index Module
//!
//! In-memory per-document lengths and byte offsets.
//!
//! ## Responsibilities
//! - Accumulate entries while a corpus is being written
//! - Serialize header + arrays to the index file at finalize
//! - Load and validate an index file for readers
//!
//! ## Integrity Check
//! `offsets` is redundant with the prefix sum of `lengths * width`. On load
//! both arrays are cross-checked, which catches truncation and most silent
//! corruption of the index (not bit flips inside token payloads; see
//! [`CorpusReader::verify_checksum`](crate::CorpusReader::verify_checksum)).

mod stats;

use std::fs;
use std::io::Write;
use std::path::Path;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::codec::{DType, Header, ENTRY_SIZE, HEADER_SIZE};
use crate::error::{CorpusError, Result};

pub use stats::CorpusStats;

/// Location of one document in the data file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentEntry {
    /// Number of tokens
    pub length: u64,
    /// Byte offset of the first token
    pub offset: u64,
}

/// Ordered document entries plus the header fields that describe them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusIndex {
    dtype: DType,
    data_crc32: u32,
    /// Token count per document
    lengths: Vec<u64>,
    /// Byte offset per document
    offsets: Vec<u64>,
    /// End of the last document; equals the data file size
    total_bytes: u64,
}

impl CorpusIndex {
    /// Create an empty index
    pub fn new(dtype: DType) -> Self {
        Self {
            dtype,
            data_crc32: 0,
            lengths: Vec::new(),
            offsets: Vec::new(),
            total_bytes: 0,
        }
    }

    /// Record a document of `length` tokens at the current end of data
    ///
    /// Returns the assigned ordinal.
    pub(crate) fn push(&mut self, length: u64) -> usize {
        let ordinal = self.lengths.len();
        self.lengths.push(length);
        self.offsets.push(self.total_bytes);
        self.total_bytes += length * self.dtype.width() as u64;
        ordinal
    }

    pub(crate) fn set_data_crc32(&mut self, crc: u32) {
        self.data_crc32 = crc;
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Load and validate an index file
    ///
    /// The whole file is read; it holds 16 bytes per document.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::decode(&bytes)
    }

    /// Parse and validate an encoded index
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let header = Header::decode(bytes)?;

        let count = usize::try_from(header.document_count).map_err(|_| {
            CorpusError::CorruptIndex(format!(
                "Document count {} does not fit in memory",
                header.document_count
            ))
        })?;

        let expected_len = count
            .checked_mul(ENTRY_SIZE)
            .and_then(|body| body.checked_add(HEADER_SIZE))
            .ok_or_else(|| {
                CorpusError::CorruptIndex(format!(
                    "Document count {} overflows the index size",
                    count
                ))
            })?;

        if bytes.len() != expected_len {
            return Err(CorpusError::CorruptIndex(format!(
                "Header declares {} documents ({} bytes) but index file has {} bytes",
                count,
                expected_len,
                bytes.len()
            )));
        }

        // Parse arrays: lengths[count] then offsets[count]
        let mut buf = &bytes[HEADER_SIZE..];
        let lengths: Vec<u64> = (0..count).map(|_| buf.get_u64_le()).collect();
        let offsets: Vec<u64> = (0..count).map(|_| buf.get_u64_le()).collect();

        let total_bytes = Self::validate_offsets(header.dtype, &lengths, &offsets)?;

        Ok(Self {
            dtype: header.dtype,
            data_crc32: header.data_crc32,
            lengths,
            offsets,
            total_bytes,
        })
    }

    /// Check offsets are the zero-based prefix sum of `lengths * width`
    ///
    /// Returns the implied data size.
    fn validate_offsets(dtype: DType, lengths: &[u64], offsets: &[u64]) -> Result<u64> {
        let width = dtype.width() as u64;
        let mut expected = 0u64;

        for (i, (&length, &offset)) in lengths.iter().zip(offsets).enumerate() {
            if offset != expected {
                return Err(CorpusError::CorruptIndex(format!(
                    "Document {} has offset {} but preceding lengths imply {}",
                    i, offset, expected
                )));
            }
            expected = length
                .checked_mul(width)
                .and_then(|bytes| expected.checked_add(bytes))
                .ok_or_else(|| {
                    CorpusError::CorruptIndex(format!(
                        "Document {} length {} overflows the data size",
                        i, length
                    ))
                })?;
        }

        Ok(expected)
    }

    /// Encode header + arrays
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(HEADER_SIZE + self.lengths.len() * ENTRY_SIZE);
        self.header().encode(&mut buf);
        for &length in &self.lengths {
            buf.put_u64_le(length);
        }
        for &offset in &self.offsets {
            buf.put_u64_le(offset);
        }
        buf.freeze()
    }

    /// Write the encoded index to `writer` and flush it
    pub fn write_into<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.encode())?;
        writer.flush()?;
        Ok(())
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Get the entry for document `index`
    pub fn entry(&self, index: usize) -> Result<DocumentEntry> {
        match (self.lengths.get(index), self.offsets.get(index)) {
            (Some(&length), Some(&offset)) => Ok(DocumentEntry { length, offset }),
            _ => Err(CorpusError::IndexOutOfRange {
                index,
                len: self.lengths.len(),
            }),
        }
    }

    /// Header describing this index
    pub fn header(&self) -> Header {
        Header::new(self.dtype, self.lengths.len() as u64, self.data_crc32)
    }

    pub fn document_count(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// CRC32 of the data file recorded at finalize
    pub fn data_crc32(&self) -> u32 {
        self.data_crc32
    }

    pub fn lengths(&self) -> &[u64] {
        &self.lengths
    }

    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    /// Sum of all document lengths
    pub fn total_tokens(&self) -> u64 {
        self.lengths.iter().sum()
    }

    /// Size the data file must have
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Summary statistics over all documents
    pub fn stats(&self) -> CorpusStats {
        CorpusStats::from_index(self)
    }
}
