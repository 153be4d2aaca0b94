//! Corpus Reader
//!
//! Opens a file pair and provides O(1) document lookups via the in-memory index.

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::codec::{check_width, DType, Token};
use crate::config::Config;
use crate::error::{CorpusError, Result};
use crate::index::{CorpusIndex, CorpusStats, DocumentEntry};
use crate::paths::CorpusPaths;

use super::iterator::Documents;

/// Read-only view of a finalized corpus
pub struct CorpusReader {
    data_path: PathBuf,
    index_path: PathBuf,
    /// Fully loaded index
    index: CorpusIndex,
    /// Mapped data file, `None` when it holds no bytes
    data: Option<Mmap>,
}

impl CorpusReader {
    /// Open a corpus file pair
    pub fn open(data_path: &Path, index_path: &Path) -> Result<Self> {
        Self::open_with_config(data_path, index_path, &Config::default())
    }

    /// Open `<prefix>.bin` and `<prefix>.idx`
    pub fn open_prefix(prefix: impl AsRef<Path>) -> Result<Self> {
        let paths = CorpusPaths::from_prefix(prefix);
        Self::open(&paths.data, &paths.index)
    }

    /// Open a corpus file pair using an explicit config
    ///
    /// On open:
    /// 1. Load and validate the index (header, array sizes, offsets)
    /// 2. Check the data file size equals the index's implied size
    /// 3. Map the data file (pages are read lazily on access)
    /// 4. Optionally verify the data checksum
    pub fn open_with_config(data_path: &Path, index_path: &Path, config: &Config) -> Result<Self> {
        let index = CorpusIndex::load(index_path)?;

        let file = File::open(data_path)?;
        let actual = file.metadata()?.len();
        let expected = index.total_bytes();
        if actual != expected {
            return Err(CorpusError::SizeMismatch { expected, actual });
        }

        let data = if actual == 0 {
            None
        } else {
            // SAFETY: finalized corpora are never modified; writing to a pair
            // while it is open for reading is unsupported.
            Some(unsafe { Mmap::map(&file)? })
        };

        tracing::debug!(
            data = %data_path.display(),
            documents = index.document_count(),
            dtype = %index.dtype(),
            bytes = actual,
            "Opened corpus reader"
        );

        let reader = Self {
            data_path: data_path.to_path_buf(),
            index_path: index_path.to_path_buf(),
            index,
            data,
        };

        if config.verify_checksum_on_open {
            reader.verify_checksum()?;
        }

        Ok(reader)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Get document `index` as token ids
    pub fn get(&self, index: usize) -> Result<Vec<u64>> {
        let entry = self.index.entry(index)?;
        Ok(self.dtype().decode(self.window(entry.offset, entry.length)))
    }

    /// Get `count` tokens of document `index`, starting at token `start`
    pub fn get_slice(&self, index: usize, start: usize, count: usize) -> Result<Vec<u64>> {
        let entry = self.index.entry(index)?;

        let end = start.checked_add(count).filter(|&end| end as u64 <= entry.length);
        let end = end.ok_or(CorpusError::RangeOutOfBounds {
            start,
            end: start.saturating_add(count),
            length: entry.length,
        })?;

        let width = self.dtype().width() as u64;
        let offset = entry.offset + start as u64 * width;
        Ok(self.dtype().decode(self.window(offset, (end - start) as u64)))
    }

    /// Get document `index` as native integers of the corpus width
    pub fn get_typed<T: Token>(&self, index: usize) -> Result<Vec<T>> {
        check_width::<T>(self.dtype())?;
        let entry = self.index.entry(index)?;

        let mut buf = self.window(entry.offset, entry.length);
        Ok((0..entry.length).map(|_| T::get_le(&mut buf)).collect())
    }

    /// Token count of document `index`
    pub fn document_len(&self, index: usize) -> Result<u64> {
        Ok(self.index.entry(index)?.length)
    }

    /// Location of document `index` in the data file
    pub fn entry(&self, index: usize) -> Result<DocumentEntry> {
        self.index.entry(index)
    }

    /// Iterate over all documents in ordinal order
    pub fn iter(&self) -> Documents<'_> {
        Documents::new(self)
    }

    /// Bytes of `length` tokens starting at byte `offset`
    ///
    /// Bounds were established at open: offsets are a validated prefix sum
    /// and the data size equals the index's total.
    fn window(&self, offset: u64, length: u64) -> &[u8] {
        let start = offset as usize;
        let end = start + length as usize * self.dtype().width();
        match &self.data {
            Some(map) => &map[start..end],
            None => &[],
        }
    }

    // =========================================================================
    // Integrity
    // =========================================================================

    /// Hash the whole data file and compare with the header's CRC32
    pub fn verify_checksum(&self) -> Result<()> {
        let bytes: &[u8] = self.data.as_deref().unwrap_or(&[]);
        let actual = crc32fast::hash(bytes);
        let expected = self.index.data_crc32();

        if actual != expected {
            return Err(CorpusError::ChecksumMismatch { expected, actual });
        }
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of documents
    pub fn len(&self) -> usize {
        self.index.document_count()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn dtype(&self) -> DType {
        self.index.dtype()
    }

    pub fn index(&self) -> &CorpusIndex {
        &self.index
    }

    pub fn stats(&self) -> CorpusStats {
        self.index.stats()
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }
}

impl<'a> IntoIterator for &'a CorpusReader {
    type Item = Vec<u64>;
    type IntoIter = Documents<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
