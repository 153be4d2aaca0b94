//! Reader Module
//!
//! Random access to finalized corpora.
//!
//! ## Responsibilities
//! - Load and validate the index file (fully, it is one entry per document)
//! - Check the data file size against the index
//! - Serve documents by ordinal from a read-only memory map
//!
//! ## Concurrency
//! Reads take `&self` and never mutate anything, so one [`CorpusReader`] can
//! be shared across threads (e.g. in an `Arc`) without locking.

mod corpus_reader;
mod iterator;

pub use corpus_reader::CorpusReader;
pub use iterator::Documents;
