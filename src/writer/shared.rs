//! Shared Writer
//!
//! Cloneable handle that serializes appends from several producer threads.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::codec::Token;
use crate::error::Result;
use crate::index::CorpusStats;

use super::CorpusWriter;

/// Thread-safe handle around a [`CorpusWriter`]
///
/// Each call holds the lock for one whole document, so the cursor and the
/// in-memory index always advance together. Ordinals follow lock order.
#[derive(Clone)]
pub struct SharedWriter {
    inner: Arc<Mutex<CorpusWriter>>,
}

impl SharedWriter {
    pub fn new(writer: CorpusWriter) -> Self {
        Self {
            inner: Arc::new(Mutex::new(writer)),
        }
    }

    /// See [`CorpusWriter::append`]
    pub fn append(&self, tokens: &[u64]) -> Result<usize> {
        self.inner.lock().append(tokens)
    }

    /// See [`CorpusWriter::append_typed`]
    pub fn append_typed<T: Token>(&self, tokens: &[T]) -> Result<usize> {
        self.inner.lock().append_typed(tokens)
    }

    pub fn document_count(&self) -> usize {
        self.inner.lock().document_count()
    }

    /// Finalize the underlying writer; later calls on any clone fail with
    /// `ClosedWriter`
    pub fn finalize(&self) -> Result<CorpusStats> {
        self.inner.lock().finalize()
    }
}

impl From<CorpusWriter> for SharedWriter {
    fn from(writer: CorpusWriter) -> Self {
        Self::new(writer)
    }
}
