//! File pair naming
//!
//! A corpus named `prefix` lives in `<prefix>.bin` (token data) and
//! `<prefix>.idx` (header + index arrays).

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Extension of the data file
pub const DATA_EXTENSION: &str = "bin";

/// Extension of the index file
pub const INDEX_EXTENSION: &str = "idx";

/// Paths of a corpus file pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusPaths {
    pub data: PathBuf,
    pub index: PathBuf,
}

impl CorpusPaths {
    /// Derive both paths from a prefix
    ///
    /// The extension is appended, not substituted:
    /// `"out/wiki.v2"` → `"out/wiki.v2.bin"` / `"out/wiki.v2.idx"`.
    pub fn from_prefix(prefix: impl AsRef<Path>) -> Self {
        let prefix = prefix.as_ref();
        Self {
            data: with_suffix(prefix, DATA_EXTENSION),
            index: with_suffix(prefix, INDEX_EXTENSION),
        }
    }
}

fn with_suffix(prefix: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}
