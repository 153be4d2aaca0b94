//! Binary Codec Module
//!
//! Byte layout shared by the writer and the reader.
//!
//! ## Index File Format (`<prefix>.idx`)
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Header (24 bytes)                                            │
//! │   Magic: "SQIX" (4) | Version: u16 (2) | DType: u8 (1)       │
//! │   Reserved (1) | DocCount: u64 (8) | DataCRC: u32 (4)        │
//! │   Reserved (4)                                               │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Lengths (8 × DocCount)                                       │
//! │   [TokenCount: u64] ... one per document ...                 │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Offsets (8 × DocCount)                                       │
//! │   [ByteOffset: u64] ... one per document ...                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Data File Format (`<prefix>.bin`)
//! ```text
//! ┌────────────────────┬────────────────┬─────┬──────────────────┐
//! │ Doc 0 tokens       │ Doc 1 tokens   │ ... │ Doc N-1 tokens   │
//! └────────────────────┴────────────────┴─────┴──────────────────┘
//! ```
//! Tokens are fixed-width little-endian unsigned integers. Documents are
//! concatenated with no padding, delimiter or per-document header; the
//! index is the only authority on document boundaries.

mod dtype;
mod header;

pub use dtype::{DType, Token};
pub(crate) use dtype::check_width;
pub use header::Header;

// =============================================================================
// Shared Constants
// =============================================================================

/// Magic bytes identifying a seqidx index file
pub const MAGIC: &[u8; 4] = b"SQIX";

/// Current index format version
pub const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + DType (1) + Reserved (1)
/// + DocCount (8) + DataCRC (4) + Reserved (4) = 24 bytes
pub const HEADER_SIZE: usize = 24;

/// Bytes per index entry: one u64 length plus one u64 offset
pub const ENTRY_SIZE: usize = 16;
