//! Configuration for seqidx
//!
//! Centralized configuration with sensible defaults.

use crate::codec::DType;
use crate::error::Result;

/// Configuration shared by [`CorpusWriter`](crate::CorpusWriter) and
/// [`CorpusReader`](crate::CorpusReader)
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Format Configuration
    // -------------------------------------------------------------------------
    /// Bytes per stored token. Fixed for the lifetime of a corpus;
    /// readers take the width from the index header instead.
    pub dtype: DType,

    // -------------------------------------------------------------------------
    // Writer Configuration
    // -------------------------------------------------------------------------
    /// Capacity of the buffered writer in front of the data file (in bytes)
    pub write_buffer_size: usize,

    /// fsync both files during finalize
    pub sync_on_finalize: bool,

    // -------------------------------------------------------------------------
    // Reader Configuration
    // -------------------------------------------------------------------------
    /// Scan the whole data file and check its CRC32 when opening a reader
    pub verify_checksum_on_open: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dtype: DType::U32,
            write_buffer_size: 1024 * 1024, // 1 MB
            sync_on_finalize: true,
            verify_checksum_on_open: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Default config with the narrowest width holding ids `0..vocab_size`
    pub fn for_vocab_size(vocab_size: u64) -> Result<Self> {
        Ok(Self {
            dtype: DType::for_vocab_size(vocab_size)?,
            ..Self::default()
        })
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the token width
    pub fn dtype(mut self, dtype: DType) -> Self {
        self.config.dtype = dtype;
        self
    }

    /// Set the data file write buffer capacity (in bytes)
    pub fn write_buffer_size(mut self, size: usize) -> Self {
        self.config.write_buffer_size = size;
        self
    }

    /// Enable or disable fsync during finalize
    pub fn sync_on_finalize(mut self, sync: bool) -> Self {
        self.config.sync_on_finalize = sync;
        self
    }

    /// Enable or disable the full-scan checksum check when opening a reader
    pub fn verify_checksum_on_open(mut self, verify: bool) -> Self {
        self.config.verify_checksum_on_open = verify;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
