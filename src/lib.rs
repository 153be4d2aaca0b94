//! # seqidx
//!
//! Indexed token-sequence storage for tokenized training corpora:
//! - Compact `.bin` data file of fixed-width little-endian token ids
//! - `.idx` index file with per-document lengths and byte offsets
//! - O(1) random access to any document without loading the corpus
//! - Single-writer / many-reader discipline
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              Tokenizer + text source (caller)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ token ids
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     CorpusWriter                            │
//! │          (append → data file, finalize → index)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ <prefix>.bin│          │ <prefix>.idx│
//!   │ (raw tokens)│          │  (header +  │
//!   │             │          │   arrays)   │
//!   └──────┬──────┘          └──────┬──────┘
//!          │ mmap, lazy             │ loaded fully
//!          └────────────┬───────────┘
//!                       ▼
//!               ┌──────────────┐
//!               │ CorpusReader │
//!               │  get(i) O(1) │
//!               └──────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use seqidx::{codec::DType, CorpusReader, CorpusWriter};
//! use std::path::Path;
//!
//! # fn main() -> seqidx::Result<()> {
//! let (bin, idx) = (Path::new("corpus.bin"), Path::new("corpus.idx"));
//!
//! let mut writer = CorpusWriter::open(bin, idx, DType::U16)?;
//! writer.append(&[1, 2, 3])?;
//! writer.append(&[42])?;
//! writer.finalize()?;
//!
//! let reader = CorpusReader::open(bin, idx)?;
//! assert_eq!(reader.get(1)?, vec![42]);
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod index;
pub mod paths;
pub mod writer;
pub mod reader;
pub mod ingest;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CorpusError, Result};
pub use config::Config;
pub use codec::{DType, Token};
pub use index::{CorpusIndex, CorpusStats, DocumentEntry};
pub use paths::CorpusPaths;
pub use writer::{CorpusWriter, SharedWriter};
pub use reader::CorpusReader;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of seqidx
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
