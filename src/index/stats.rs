//! Corpus statistics

use std::fmt;

use crate::codec::DType;

use super::CorpusIndex;

/// Totals over every document in a corpus
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusStats {
    pub dtype: DType,
    pub documents: usize,
    pub total_tokens: u64,
    /// Data file size
    pub total_bytes: u64,
    /// Documents with zero tokens
    pub empty_documents: usize,
    /// Shortest document (0 for an empty corpus)
    pub min_length: u64,
    /// Longest document (0 for an empty corpus)
    pub max_length: u64,
    /// Mean tokens per document (0.0 for an empty corpus)
    pub mean_length: f64,
}

impl CorpusStats {
    pub fn from_index(index: &CorpusIndex) -> Self {
        let lengths = index.lengths();
        let documents = lengths.len();
        let total_tokens = index.total_tokens();

        let mean_length = if documents == 0 {
            0.0
        } else {
            total_tokens as f64 / documents as f64
        };

        Self {
            dtype: index.dtype(),
            documents,
            total_tokens,
            total_bytes: index.total_bytes(),
            empty_documents: lengths.iter().filter(|&&len| len == 0).count(),
            min_length: lengths.iter().copied().min().unwrap_or(0),
            max_length: lengths.iter().copied().max().unwrap_or(0),
            mean_length,
        }
    }
}

impl fmt::Display for CorpusStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "dtype:           {}", self.dtype)?;
        writeln!(f, "documents:       {}", self.documents)?;
        writeln!(f, "total tokens:    {}", self.total_tokens)?;
        writeln!(f, "data bytes:      {}", self.total_bytes)?;
        writeln!(f, "empty documents: {}", self.empty_documents)?;
        writeln!(f, "min length:      {}", self.min_length)?;
        writeln!(f, "max length:      {}", self.max_length)?;
        write!(f, "mean length:     {:.2}", self.mean_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_over_documents() {
        let mut index = CorpusIndex::new(DType::U16);
        index.push(3);
        index.push(0);
        index.push(5);

        let stats = index.stats();
        assert_eq!(stats.documents, 3);
        assert_eq!(stats.total_tokens, 8);
        assert_eq!(stats.total_bytes, 16);
        assert_eq!(stats.empty_documents, 1);
        assert_eq!(stats.min_length, 0);
        assert_eq!(stats.max_length, 5);
        assert!((stats.mean_length - 8.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_stats_empty_corpus() {
        let stats = CorpusIndex::new(DType::U8).stats();
        assert_eq!(stats.documents, 0);
        assert_eq!(stats.min_length, 0);
        assert_eq!(stats.mean_length, 0.0);
    }
}
