//! Tests for CorpusWriter
//!
//! These tests verify:
//! - File creation and truncation
//! - Ordinal assignment and byte accounting
//! - Token range enforcement (nothing committed on failure)
//! - Width mixing detection for typed appends
//! - Finalize lifecycle (closed writer errors, index contents)
//! - SharedWriter serialization across threads

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use seqidx::{Config, CorpusError, CorpusIndex, CorpusReader, CorpusWriter, DType, SharedWriter};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_corpus() -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("corpus.bin");
    let index = temp_dir.path().join("corpus.idx");
    (temp_dir, data, index)
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_creates_both_files() {
    let (_temp, data, index) = setup_temp_corpus();

    let writer = CorpusWriter::open(&data, &index, DType::U16).unwrap();

    assert!(data.exists());
    assert!(index.exists());
    assert_eq!(writer.document_count(), 0);
    assert_eq!(writer.dtype(), DType::U16);
    assert!(!writer.is_closed());
}

#[test]
fn test_open_truncates_existing_files() {
    let (_temp, data, index) = setup_temp_corpus();
    fs::write(&data, b"stale data").unwrap();
    fs::write(&index, b"stale index").unwrap();

    let mut writer = CorpusWriter::open(&data, &index, DType::U8).unwrap();
    writer.finalize().unwrap();

    assert_eq!(fs::metadata(&data).unwrap().len(), 0);
    let loaded = CorpusIndex::load(&index).unwrap();
    assert_eq!(loaded.document_count(), 0);
}

#[test]
fn test_open_rejects_same_path() {
    let (_temp, data, _index) = setup_temp_corpus();

    let result = CorpusWriter::open(&data, &data, DType::U8);
    assert!(matches!(result, Err(CorpusError::Config(_))));
}

#[test]
fn test_create_from_prefix() {
    let temp = TempDir::new().unwrap();
    let prefix = temp.path().join("wiki");

    let mut writer = CorpusWriter::create(&prefix, &Config::default()).unwrap();
    writer.append(&[1, 2]).unwrap();
    writer.finalize().unwrap();

    assert!(temp.path().join("wiki.bin").exists());
    assert!(temp.path().join("wiki.idx").exists());
}

#[test]
fn test_create_makes_missing_parent_dirs() {
    let temp = TempDir::new().unwrap();
    let prefix = temp.path().join("out").join("sub").join("megatron_dataset");

    let mut writer = CorpusWriter::create(&prefix, &Config::default()).unwrap();
    writer.append(&[1, 2]).unwrap();
    writer.finalize().unwrap();

    let reader = CorpusReader::open_prefix(&prefix).unwrap();
    assert_eq!(reader.get(0).unwrap(), vec![1, 2]);
}

// =============================================================================
// Append Tests
// =============================================================================

#[test]
fn test_append_assigns_sequential_ordinals() {
    let (_temp, data, index) = setup_temp_corpus();
    let mut writer = CorpusWriter::open(&data, &index, DType::U32).unwrap();

    for expected in 0..10 {
        let ordinal = writer.append(&[expected as u64; 3]).unwrap();
        assert_eq!(ordinal, expected);
    }

    assert_eq!(writer.document_count(), 10);
    assert_eq!(writer.bytes_written(), 10 * 3 * 4);
}

#[test]
fn test_append_empty_document() {
    let (_temp, data, index) = setup_temp_corpus();
    let mut writer = CorpusWriter::open(&data, &index, DType::U16).unwrap();

    assert_eq!(writer.append(&[]).unwrap(), 0);
    assert_eq!(writer.append(&[5]).unwrap(), 1);

    assert_eq!(writer.index().offsets(), &[0, 0]);
    assert_eq!(writer.bytes_written(), 2);
}

#[test]
fn test_append_one_past_max_fails() {
    let (_temp, data, index) = setup_temp_corpus();
    let mut writer = CorpusWriter::open(&data, &index, DType::U16).unwrap();

    writer.append(&[1]).unwrap();
    let result = writer.append(&[1, 2, 65_536]);

    assert!(matches!(result, Err(CorpusError::Encoding(_))));
    assert_eq!(writer.document_count(), 1);
    assert_eq!(writer.bytes_written(), 2);

    // Writer stays usable and the next ordinal is unchanged
    assert_eq!(writer.append(&[65_535]).unwrap(), 1);
}

#[test]
fn test_failed_append_leaves_no_bytes() {
    let (_temp, data, index) = setup_temp_corpus();
    let mut writer = CorpusWriter::open(&data, &index, DType::U8).unwrap();

    writer.append(&[1, 2]).unwrap();
    assert!(writer.append(&[3, 300]).is_err());
    writer.append(&[4]).unwrap();
    writer.finalize().unwrap();

    assert_eq!(fs::read(&data).unwrap(), vec![1, 2, 4]);
}

#[test]
fn test_max_token_per_width_accepted() {
    for dtype in [DType::U8, DType::U16, DType::U32, DType::U64] {
        let (_temp, data, index) = setup_temp_corpus();
        let mut writer = CorpusWriter::open(&data, &index, dtype).unwrap();

        writer.append(&[0, dtype.max_token()]).unwrap();
        writer.finalize().unwrap();

        let reader = CorpusReader::open(&data, &index).unwrap();
        assert_eq!(reader.get(0).unwrap(), vec![0, dtype.max_token()]);
    }
}

#[test]
fn test_append_typed_matching_width() {
    let (_temp, data, index) = setup_temp_corpus();
    let mut writer = CorpusWriter::open(&data, &index, DType::U16).unwrap();

    assert_eq!(writer.append_typed(&[7u16, 8, 9]).unwrap(), 0);
    assert_eq!(writer.append(&[10]).unwrap(), 1);
    writer.finalize().unwrap();

    let reader = CorpusReader::open(&data, &index).unwrap();
    assert_eq!(reader.get(0).unwrap(), vec![7, 8, 9]);
    assert_eq!(reader.get_typed::<u16>(1).unwrap(), vec![10u16]);
}

#[test]
fn test_append_typed_width_mixing_fails() {
    let (_temp, data, index) = setup_temp_corpus();
    let mut writer = CorpusWriter::open(&data, &index, DType::U16).unwrap();

    let result = writer.append_typed(&[1u32, 2]);

    assert!(matches!(result, Err(CorpusError::Encoding(_))));
    assert_eq!(writer.document_count(), 0);
}

#[test]
fn test_small_buffer_flushes_during_append() {
    let (_temp, data, index) = setup_temp_corpus();
    let config = Config::builder()
        .dtype(DType::U32)
        .write_buffer_size(8)
        .sync_on_finalize(false)
        .build();
    let mut writer = CorpusWriter::open_with_config(&data, &index, &config).unwrap();

    writer.append(&[1, 2, 3]).unwrap();
    // Buffer limit exceeded: bytes already reached the file
    assert_eq!(fs::metadata(&data).unwrap().len(), 12);

    writer.append(&[4]).unwrap();
    writer.finalize().unwrap();

    let reader = CorpusReader::open(&data, &index).unwrap();
    assert_eq!(reader.get(0).unwrap(), vec![1, 2, 3]);
    assert_eq!(reader.get(1).unwrap(), vec![4]);
    reader.verify_checksum().unwrap();
}

#[test]
fn test_data_file_holds_only_committed_bytes() {
    let (_temp, data, index) = setup_temp_corpus();
    let config = Config::builder()
        .dtype(DType::U8)
        .write_buffer_size(3)
        .build();
    let mut writer = CorpusWriter::open_with_config(&data, &index, &config).unwrap();

    // Rejected appends interleaved with flushing ones
    writer.append(&[1, 2, 3, 4]).unwrap();
    assert!(writer.append(&[5, 256]).is_err());
    assert!(writer.append_typed(&[5u16]).is_err());
    writer.append(&[6]).unwrap();
    assert!(writer.append(&[7, 8, 9, 1000]).is_err());
    writer.append(&[10, 11, 12]).unwrap();
    writer.append(&[]).unwrap();
    writer.finalize().unwrap();

    assert_eq!(fs::read(&data).unwrap(), vec![1, 2, 3, 4, 6, 10, 11, 12]);
    assert_eq!(fs::metadata(&data).unwrap().len(), writer.bytes_written());

    let reader = CorpusReader::open(&data, &index).unwrap();
    reader.verify_checksum().unwrap();
    assert_eq!(reader.len(), 4);
    assert_eq!(reader.get(2).unwrap(), vec![10, 11, 12]);
}

#[cfg(target_os = "linux")]
#[test]
fn test_failed_flush_keeps_writer_usable() {
    let temp = TempDir::new().unwrap();
    let index = temp.path().join("full.idx");
    let config = Config::builder()
        .dtype(DType::U8)
        .write_buffer_size(2)
        .build();

    // Every write to /dev/full fails with ENOSPC
    let mut writer =
        CorpusWriter::open_with_config(Path::new("/dev/full"), &index, &config).unwrap();

    let result = writer.append(&[1, 2, 3]);
    assert!(matches!(result, Err(CorpusError::Io(_))));
    assert_eq!(writer.document_count(), 0);
    assert_eq!(writer.bytes_written(), 0);
    assert!(!writer.is_closed());

    // Below the buffer limit nothing is flushed, and the ordinal is reused
    assert_eq!(writer.append(&[4]).unwrap(), 0);
    assert_eq!(writer.bytes_written(), 1);

    // The final flush fails too; the writer is closed either way
    assert!(matches!(writer.finalize(), Err(CorpusError::Io(_))));
    assert!(writer.is_closed());
    assert!(matches!(writer.append(&[5]), Err(CorpusError::ClosedWriter)));
}

// =============================================================================
// Finalize Tests
// =============================================================================

#[test]
fn test_append_after_finalize_fails() {
    let (_temp, data, index) = setup_temp_corpus();
    let mut writer = CorpusWriter::open(&data, &index, DType::U8).unwrap();

    writer.append(&[1]).unwrap();
    writer.finalize().unwrap();

    assert!(writer.is_closed());
    assert!(matches!(writer.append(&[2]), Err(CorpusError::ClosedWriter)));
    assert!(matches!(
        writer.append_typed(&[2u8]),
        Err(CorpusError::ClosedWriter)
    ));
}

#[test]
fn test_double_finalize_fails() {
    let (_temp, data, index) = setup_temp_corpus();
    let mut writer = CorpusWriter::open(&data, &index, DType::U8).unwrap();

    writer.finalize().unwrap();
    assert!(matches!(writer.finalize(), Err(CorpusError::ClosedWriter)));
}

#[test]
fn test_finalize_returns_stats() {
    let (_temp, data, index) = setup_temp_corpus();
    let mut writer = CorpusWriter::open(&data, &index, DType::U16).unwrap();

    writer.append(&[1, 2, 3]).unwrap();
    writer.append(&[]).unwrap();
    writer.append(&[4, 5]).unwrap();
    let stats = writer.finalize().unwrap();

    assert_eq!(stats.documents, 3);
    assert_eq!(stats.total_tokens, 5);
    assert_eq!(stats.total_bytes, 10);
    assert_eq!(stats.empty_documents, 1);
    assert_eq!(stats.max_length, 3);
}

#[test]
fn test_index_file_size_after_finalize() {
    let (_temp, data, index) = setup_temp_corpus();
    let mut writer = CorpusWriter::open(&data, &index, DType::U8).unwrap();

    for _ in 0..4 {
        writer.append(&[1, 2]).unwrap();
    }
    writer.finalize().unwrap();

    // Header (24) + 4 lengths + 4 offsets
    assert_eq!(fs::metadata(&index).unwrap().len(), 24 + 4 * 16);
}

#[test]
fn test_unfinalized_writer_leaves_unreadable_pair() {
    let (_temp, data, index) = setup_temp_corpus();
    {
        let mut writer = CorpusWriter::open(&data, &index, DType::U8).unwrap();
        writer.append(&[1, 2, 3]).unwrap();
        // Dropped without finalize
    }

    let result = CorpusReader::open(&data, &index);
    assert!(matches!(result, Err(CorpusError::Format(_))));
}

// =============================================================================
// SharedWriter Tests
// =============================================================================

#[test]
fn test_shared_writer_concurrent_appends() {
    let (_temp, data, index) = setup_temp_corpus();
    let writer = SharedWriter::new(CorpusWriter::open(&data, &index, DType::U32).unwrap());

    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let writer = writer.clone();
            thread::spawn(move || {
                for i in 0..25u64 {
                    // Every token of a document carries the same value
                    writer.append(&[t * 1000 + i; 5]).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(writer.document_count(), 100);
    writer.finalize().unwrap();

    let reader = CorpusReader::open(&data, &index).unwrap();
    assert_eq!(reader.len(), 100);
    for doc in reader.iter() {
        assert_eq!(doc.len(), 5);
        assert!(doc.iter().all(|&id| id == doc[0]));
    }
}

#[test]
fn test_shared_writer_closed_for_all_clones() {
    let (_temp, data, index) = setup_temp_corpus();
    let writer = SharedWriter::from(CorpusWriter::open(&data, &index, DType::U8).unwrap());
    let other = writer.clone();

    writer.finalize().unwrap();

    assert!(matches!(other.append(&[1]), Err(CorpusError::ClosedWriter)));
}
