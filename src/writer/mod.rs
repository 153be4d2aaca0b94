//! Writer Module
//!
//! Streams token sequences into a `.bin`/`.idx` file pair.
//!
//! ## Responsibilities
//! - Validate every token id against the corpus width before writing
//! - Append encoded tokens to the data file and record (length, offset)
//! - Serialize header + index arrays on finalize
//!
//! ## Lifecycle
//! ```text
//!   open ──► append* ──► finalize ──► (closed: append/finalize fail)
//! ```
//! Durability comes from finalize-or-retry-from-scratch: until finalize the
//! index file is empty and the pair cannot be opened by a reader.
//!
//! ## Concurrency
//! [`CorpusWriter`] takes `&mut self` and belongs to one producer.
//! [`SharedWriter`] serializes appends from several threads behind a mutex.

mod corpus_writer;
mod shared;

pub use corpus_writer::CorpusWriter;
pub use shared::SharedWriter;
