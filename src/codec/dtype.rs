//! Token widths
//!
//! Integer width selection and the fixed-width little-endian token encoding
//! used by the data file.

use std::fmt;

use bytes::{Buf, BufMut};

use crate::error::{CorpusError, Result};

/// Bytes per stored token, fixed for the lifetime of a corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DType {
    /// 1 byte per token (vocab ≤ 256)
    U8,
    /// 2 bytes per token (vocab ≤ 65536)
    U16,
    /// 4 bytes per token (vocab ≤ 2^32)
    U32,
    /// 8 bytes per token
    U64,
}

impl DType {
    /// Width in bytes
    pub const fn width(self) -> usize {
        match self {
            DType::U8 => 1,
            DType::U16 => 2,
            DType::U32 => 4,
            DType::U64 => 8,
        }
    }

    /// Code stored in the index header (the width itself)
    pub const fn code(self) -> u8 {
        self.width() as u8
    }

    /// Parse a header code
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            1 => Ok(DType::U8),
            2 => Ok(DType::U16),
            4 => Ok(DType::U32),
            8 => Ok(DType::U64),
            other => Err(CorpusError::Format(format!(
                "Invalid token width code: {}",
                other
            ))),
        }
    }

    /// Largest token id representable at this width
    pub const fn max_token(self) -> u64 {
        match self {
            DType::U8 => u8::MAX as u64,
            DType::U16 => u16::MAX as u64,
            DType::U32 => u32::MAX as u64,
            DType::U64 => u64::MAX,
        }
    }

    /// Whether `id` fits in this width
    pub const fn fits(self, id: u64) -> bool {
        id <= self.max_token()
    }

    /// Narrowest width holding every id in `0..vocab_size`
    pub fn for_vocab_size(vocab_size: u64) -> Result<Self> {
        match vocab_size {
            0 => Err(CorpusError::Config(
                "Vocabulary size must be at least 1".to_string(),
            )),
            1..=256 => Ok(DType::U8),
            257..=65_536 => Ok(DType::U16),
            65_537..=4_294_967_296 => Ok(DType::U32),
            _ => Ok(DType::U64),
        }
    }

    /// Check every id fits, reporting the first offender
    pub fn check_tokens(self, tokens: &[u64]) -> Result<()> {
        if self == DType::U64 {
            return Ok(());
        }
        let max = self.max_token();
        match tokens.iter().position(|&id| id > max) {
            Some(pos) => Err(CorpusError::Encoding(format!(
                "Token id {} at position {} exceeds {} maximum {}",
                tokens[pos], pos, self, max
            ))),
            None => Ok(()),
        }
    }

    /// Validate `tokens`, then append their encoding to `out`
    ///
    /// Nothing is written to `out` when validation fails.
    pub fn encode_into<B: BufMut>(self, tokens: &[u64], out: &mut B) -> Result<()> {
        self.check_tokens(tokens)?;

        // Narrowing casts are lossless after check_tokens
        match self {
            DType::U8 => tokens.iter().for_each(|&id| out.put_u8(id as u8)),
            DType::U16 => tokens.iter().for_each(|&id| out.put_u16_le(id as u16)),
            DType::U32 => tokens.iter().for_each(|&id| out.put_u32_le(id as u32)),
            DType::U64 => tokens.iter().for_each(|&id| out.put_u64_le(id)),
        }
        Ok(())
    }

    /// Decode whole tokens from `bytes` into `out`
    ///
    /// A trailing partial token is ignored; callers pass exact windows.
    pub fn decode_into(self, bytes: &[u8], out: &mut Vec<u64>) {
        let whole = bytes.len() - bytes.len() % self.width();
        let mut buf = &bytes[..whole];
        out.reserve(whole / self.width());

        match self {
            DType::U8 => out.extend(buf.iter().map(|&b| u64::from(b))),
            DType::U16 => {
                while buf.has_remaining() {
                    out.push(u64::from(buf.get_u16_le()));
                }
            }
            DType::U32 => {
                while buf.has_remaining() {
                    out.push(u64::from(buf.get_u32_le()));
                }
            }
            DType::U64 => {
                while buf.has_remaining() {
                    out.push(buf.get_u64_le());
                }
            }
        }
    }

    /// Decode whole tokens from `bytes`
    pub fn decode(self, bytes: &[u8]) -> Vec<u64> {
        let mut out = Vec::new();
        self.decode_into(bytes, &mut out);
        out
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::U8 => "uint8",
            DType::U16 => "uint16",
            DType::U32 => "uint32",
            DType::U64 => "uint64",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Native Token Types
// =============================================================================

/// A native unsigned integer type that maps onto exactly one [`DType`]
///
/// Typed appends and reads require `T::DTYPE` to equal the corpus width, so
/// a corpus never mixes widths.
pub trait Token: Copy + Send + Sync + 'static {
    /// Width this type is stored at
    const DTYPE: DType;

    /// Append the little-endian encoding to `out`
    fn put_le<B: BufMut>(self, out: &mut B);

    /// Read one token from the front of `buf`, advancing it
    fn get_le(buf: &mut &[u8]) -> Self;
}

impl Token for u8 {
    const DTYPE: DType = DType::U8;

    fn put_le<B: BufMut>(self, out: &mut B) {
        out.put_u8(self);
    }

    fn get_le(buf: &mut &[u8]) -> Self {
        buf.get_u8()
    }
}

impl Token for u16 {
    const DTYPE: DType = DType::U16;

    fn put_le<B: BufMut>(self, out: &mut B) {
        out.put_u16_le(self);
    }

    fn get_le(buf: &mut &[u8]) -> Self {
        buf.get_u16_le()
    }
}

impl Token for u32 {
    const DTYPE: DType = DType::U32;

    fn put_le<B: BufMut>(self, out: &mut B) {
        out.put_u32_le(self);
    }

    fn get_le(buf: &mut &[u8]) -> Self {
        buf.get_u32_le()
    }
}

impl Token for u64 {
    const DTYPE: DType = DType::U64;

    fn put_le<B: BufMut>(self, out: &mut B) {
        out.put_u64_le(self);
    }

    fn get_le(buf: &mut &[u8]) -> Self {
        buf.get_u64_le()
    }
}

/// Ensure a native token type matches the corpus width
pub(crate) fn check_width<T: Token>(dtype: DType) -> Result<()> {
    if T::DTYPE != dtype {
        return Err(CorpusError::Encoding(format!(
            "Width mixing: corpus stores {} tokens, got {}",
            dtype,
            T::DTYPE
        )));
    }
    Ok(())
}
