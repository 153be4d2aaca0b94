//! Error types for seqidx
//!
//! Provides a unified error type for all corpus operations.

use thiserror::Error;

/// Result type alias using CorpusError
pub type Result<T> = std::result::Result<T, CorpusError>;

/// Unified error type for seqidx operations
#[derive(Debug, Error)]
pub enum CorpusError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Format Errors (index file header)
    // -------------------------------------------------------------------------
    #[error("Format error: {0}")]
    Format(String),

    #[error("Unsupported format version {found} (supported: {supported})")]
    UnsupportedVersion { found: u16, supported: u16 },

    // -------------------------------------------------------------------------
    // Integrity Errors
    // -------------------------------------------------------------------------
    #[error("Corrupt index: {0}")]
    CorruptIndex(String),

    #[error("Data file size mismatch: index expects {expected} bytes, file has {actual}")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("Data checksum mismatch: header has {expected:#010x}, data hashes to {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    // -------------------------------------------------------------------------
    // Encoding Errors
    // -------------------------------------------------------------------------
    #[error("Encoding error: {0}")]
    Encoding(String),

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("Document index {index} out of range (document count: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Token range {start}..{end} out of bounds for document of length {length}")]
    RangeOutOfBounds { start: usize, end: usize, length: u64 },

    // -------------------------------------------------------------------------
    // Writer Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("Writer is closed (already finalized)")]
    ClosedWriter,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
