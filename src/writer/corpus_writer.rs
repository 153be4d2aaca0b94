//! Corpus Writer
//!
//! Appends documents to a new data file and writes the index at finalize.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use bytes::BytesMut;

use crate::codec::{check_width, DType, Token};
use crate::config::Config;
use crate::error::{CorpusError, Result};
use crate::index::{CorpusIndex, CorpusStats};
use crate::paths::CorpusPaths;

/// Single-owner writer for a corpus file pair
pub struct CorpusWriter {
    data_path: PathBuf,
    index_path: PathBuf,
    dtype: DType,
    sync_on_finalize: bool,
    /// Entries committed so far; `total_bytes()` is the write cursor
    index: CorpusIndex,
    /// Open handles, `None` once finalized
    files: Option<OpenFiles>,
}

/// Handles and buffers owned between open and finalize
///
/// Invariant: bytes `[0, flushed)` of the data file plus `buffer` are exactly
/// the committed documents. Anything past `flushed` on disk is untrusted.
struct OpenFiles {
    data: File,
    index: File,
    buffer: BytesMut,
    buffer_limit: usize,
    flushed: u64,
    hasher: crc32fast::Hasher,
}

impl OpenFiles {
    /// Write the buffer at `flushed`
    ///
    /// On failure the buffer is kept and the file is trimmed back to
    /// `flushed`, so a later flush retries from a clean position.
    fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let result = self
            .data
            .seek(SeekFrom::Start(self.flushed))
            .and_then(|_| self.data.write_all(&self.buffer));

        if let Err(e) = result {
            if let Err(trim_err) = self.data.set_len(self.flushed) {
                tracing::warn!(
                    flushed = self.flushed,
                    error = %trim_err,
                    "Failed to trim data file after write error"
                );
            }
            return Err(e.into());
        }

        self.flushed += self.buffer.len() as u64;
        self.buffer.clear();
        Ok(())
    }
}

impl CorpusWriter {
    /// Create (or truncate) both files and return a writer bound to them
    pub fn open(data_path: &Path, index_path: &Path, dtype: DType) -> Result<Self> {
        let config = Config::builder().dtype(dtype).build();
        Self::open_with_config(data_path, index_path, &config)
    }

    /// Create `<prefix>.bin` and `<prefix>.idx`
    ///
    /// Missing parent directories of the prefix are created.
    pub fn create(prefix: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let paths = CorpusPaths::from_prefix(prefix);
        if let Some(parent) = paths.data.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Self::open_with_config(&paths.data, &paths.index, config)
    }

    /// Create (or truncate) both files using an explicit config
    pub fn open_with_config(data_path: &Path, index_path: &Path, config: &Config) -> Result<Self> {
        if data_path == index_path {
            return Err(CorpusError::Config(format!(
                "Data and index paths must differ: {}",
                data_path.display()
            )));
        }

        let data = Self::create_truncated(data_path)?;
        // Truncating the index up front leaves no stale index paired with new data
        let index = Self::create_truncated(index_path)?;

        tracing::debug!(
            data = %data_path.display(),
            index = %index_path.display(),
            dtype = %config.dtype,
            "Opened corpus writer"
        );

        Ok(Self {
            data_path: data_path.to_path_buf(),
            index_path: index_path.to_path_buf(),
            dtype: config.dtype,
            sync_on_finalize: config.sync_on_finalize,
            index: CorpusIndex::new(config.dtype),
            files: Some(OpenFiles {
                data,
                index,
                buffer: BytesMut::with_capacity(config.write_buffer_size),
                buffer_limit: config.write_buffer_size,
                flushed: 0,
                hasher: crc32fast::Hasher::new(),
            }),
        })
    }

    fn create_truncated(path: &Path) -> Result<File> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(file)
    }

    // =========================================================================
    // Appending
    // =========================================================================

    /// Append one document, returning its ordinal
    ///
    /// Every id is checked against the corpus width before anything is
    /// written; a violation fails the whole call and commits nothing.
    pub fn append(&mut self, tokens: &[u64]) -> Result<usize> {
        let dtype = self.dtype;
        let files = self.files.as_mut().ok_or(CorpusError::ClosedWriter)?;

        let mark = files.buffer.len();
        dtype.encode_into(tokens, &mut files.buffer)?;

        Self::commit(files, &mut self.index, mark, tokens.len())
    }

    /// Append one document of native integers
    ///
    /// `T` must be the corpus width; e.g. `u16` for a `DType::U16` corpus.
    pub fn append_typed<T: Token>(&mut self, tokens: &[T]) -> Result<usize> {
        let files = self.files.as_mut().ok_or(CorpusError::ClosedWriter)?;
        check_width::<T>(self.dtype)?;

        let mark = files.buffer.len();
        for &token in tokens {
            token.put_le(&mut files.buffer);
        }

        Self::commit(files, &mut self.index, mark, tokens.len())
    }

    /// Commit the bytes encoded after `mark` as one document
    fn commit(
        files: &mut OpenFiles,
        index: &mut CorpusIndex,
        mark: usize,
        length: usize,
    ) -> Result<usize> {
        if files.buffer.len() >= files.buffer_limit {
            // Only the new document is dropped; earlier ones stay buffered
            Self::flush_or_discard(files, mark)?;
        } else {
            files.hasher.update(&files.buffer[mark..]);
        }

        let offset = index.total_bytes();
        let ordinal = index.push(length as u64);
        tracing::trace!(ordinal, length, offset, "Appended document");
        Ok(ordinal)
    }

    /// Hash the pending document, then flush; undo both on failure
    fn flush_or_discard(files: &mut OpenFiles, mark: usize) -> Result<()> {
        let before = files.hasher.clone();
        files.hasher.update(&files.buffer[mark..]);

        if let Err(e) = files.flush() {
            files.buffer.truncate(mark);
            files.hasher = before;
            return Err(e);
        }
        Ok(())
    }

    // =========================================================================
    // Finalize
    // =========================================================================

    /// Commit the index file and close both handles
    ///
    /// The handles are released on every return path; afterwards the writer
    /// is closed even if finalize failed, and the pair must be rewritten.
    pub fn finalize(&mut self) -> Result<CorpusStats> {
        let mut files = self.files.take().ok_or(CorpusError::ClosedWriter)?;

        files.flush()?;

        // Drop any bytes a failed flush left past the committed end
        let committed = self.index.total_bytes();
        let on_disk = files.data.metadata()?.len();
        if on_disk != committed {
            tracing::warn!(on_disk, committed, "Trimming unindexed bytes from data file");
            files.data.set_len(committed)?;
        }
        if self.sync_on_finalize {
            files.data.sync_all()?;
        }

        self.index.set_data_crc32(files.hasher.finalize());

        let mut out = BufWriter::new(files.index);
        self.index.write_into(&mut out)?;
        let index_file = out.into_inner().map_err(|e| e.into_error())?;
        if self.sync_on_finalize {
            index_file.sync_all()?;
        }

        let stats = self.index.stats();
        tracing::info!(
            data = %self.data_path.display(),
            documents = stats.documents,
            total_tokens = stats.total_tokens,
            mean_length = stats.mean_length,
            "Finalized corpus"
        );

        Ok(stats)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of documents committed so far
    pub fn document_count(&self) -> usize {
        self.index.document_count()
    }

    /// Bytes of token data committed so far
    pub fn bytes_written(&self) -> u64 {
        self.index.total_bytes()
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Whether finalize has been called
    pub fn is_closed(&self) -> bool {
        self.files.is_none()
    }

    /// In-memory index of committed documents
    pub fn index(&self) -> &CorpusIndex {
        &self.index
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }
}

impl Drop for CorpusWriter {
    fn drop(&mut self) {
        if self.files.is_some() {
            tracing::warn!(
                data = %self.data_path.display(),
                documents = self.index.document_count(),
                "Corpus writer dropped without finalize; no index was written"
            );
        }
    }
}
