//! Ingest glue
//!
//! Feeds raw text records through a tokenizer into a [`CorpusWriter`].
//! The storage core never sees text; this module is the only place that
//! calls a tokenizer.
//!
//! Per-record policy:
//! - empty or whitespace-only text is skipped
//! - texts that encode to zero tokens are skipped
//! - tokenizer and encoding failures are counted; the run stops once more
//!   than `max_errors` have been seen
//! - I/O and closed-writer errors abort immediately

use crate::error::{CorpusError, Result};
use crate::writer::CorpusWriter;

/// Text ↔ token id conversion supplied by the caller
pub trait Tokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u64>>;

    fn decode(&self, tokens: &[u64]) -> Result<String>;
}

/// Tokenizer for text that already holds whitespace-separated integer ids
#[derive(Debug, Clone, Copy, Default)]
pub struct PreTokenized;

impl Tokenizer for PreTokenized {
    fn encode(&self, text: &str) -> Result<Vec<u64>> {
        text.split_whitespace()
            .map(|word| {
                word.parse::<u64>().map_err(|e| {
                    CorpusError::Encoding(format!("Invalid token id {:?}: {}", word, e))
                })
            })
            .collect()
    }

    fn decode(&self, tokens: &[u64]) -> Result<String> {
        let words: Vec<String> = tokens.iter().map(|id| id.to_string()).collect();
        Ok(words.join(" "))
    }
}

/// Ingest options
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Stop after more than this many failed records
    pub max_errors: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self { max_errors: 100 }
    }
}

/// Totals of one ingest run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Records read from the source
    pub records: usize,
    /// Documents appended
    pub documents: usize,
    /// Records skipped as empty
    pub skipped: usize,
    /// Records that failed to tokenize or encode
    pub errors: usize,
    /// Tokens appended
    pub total_tokens: u64,
    /// Whether the run stopped at `max_errors`
    pub aborted: bool,
}

/// Tokenize `texts` and append each non-empty result to `writer`
///
/// The writer is not finalized; the caller does that once the run is done.
pub fn ingest<I, T>(
    writer: &mut CorpusWriter,
    texts: I,
    tokenizer: &T,
    options: &IngestOptions,
) -> Result<IngestReport>
where
    I: IntoIterator<Item = Result<String>>,
    T: Tokenizer + ?Sized,
{
    let mut report = IngestReport::default();

    for (i, text) in texts.into_iter().enumerate() {
        report.records += 1;

        // The source failing (not one of its records) is fatal
        let text = text?;
        if text.trim().is_empty() {
            tracing::debug!(record = i, "Skipping empty text");
            report.skipped += 1;
            continue;
        }

        let appended = tokenizer
            .encode(&text)
            .and_then(|tokens| {
                if tokens.is_empty() {
                    return Ok(None);
                }
                writer.append(&tokens).map(|_| Some(tokens.len()))
            });

        match appended {
            Ok(Some(length)) => {
                report.documents += 1;
                report.total_tokens += length as u64;
            }
            Ok(None) => {
                tracing::debug!(record = i, "Skipping text with no tokens");
                report.skipped += 1;
            }
            Err(e @ (CorpusError::Io(_) | CorpusError::ClosedWriter)) => return Err(e),
            Err(e) => {
                tracing::warn!(record = i, error = %e, "Failed to ingest record");
                report.errors += 1;
                if report.errors > options.max_errors {
                    tracing::error!(errors = report.errors, "Too many errors, stopping ingest");
                    report.aborted = true;
                    break;
                }
            }
        }
    }

    tracing::info!(
        records = report.records,
        documents = report.documents,
        skipped = report.skipped,
        errors = report.errors,
        total_tokens = report.total_tokens,
        "Ingest complete"
    );

    Ok(report)
}
