//! Document Iterator
//!
//! Sequential iteration over all documents of a corpus.

use super::CorpusReader;

/// Iterator over documents in ordinal order
pub struct Documents<'a> {
    reader: &'a CorpusReader,
    next: usize,
}

impl<'a> Documents<'a> {
    pub(super) fn new(reader: &'a CorpusReader) -> Self {
        Self { reader, next: 0 }
    }
}

impl<'a> Iterator for Documents<'a> {
    type Item = Vec<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.reader.len() {
            return None;
        }
        let ordinal = self.next;
        self.next += 1;

        match self.reader.get(ordinal) {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                tracing::error!(ordinal, error = %e, "Document lookup failed during iteration");
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.reader.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Documents<'_> {}
