// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only CSV storage, one self-initializing file per metric kind.
//!
//! Files are opened, appended to, and closed on every write; no handle or
//! lock outlives a call. Each row is serialized in full before the single
//! `write_all`, so a reader never sees a half-built row from this process.
//! Concurrent writers in other processes are not coordinated.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use ragwatch_core::{MetricKind, MetricRecord, MetricsSource, RagwatchError, Result};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Directory of append-only metric files.
#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    /// Create a store rooted at `dir`. Nothing is touched on disk until the
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The metrics directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `kind`.
    pub fn path(&self, kind: MetricKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    /// Create the file for `kind` with its header row if it does not exist.
    ///
    /// Returns `true` when this call wrote the header. Safe to call before
    /// every append: a file that already holds data is never rewritten. An
    /// empty file, left behind when a header write failed, gets its header
    /// now so no data row can precede it.
    pub fn ensure_initialized(&self, kind: MetricKind) -> Result<bool> {
        std::fs::create_dir_all(&self.dir).map_err(|e| RagwatchError::storage(kind, e))?;
        let path = self.path(kind);

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let len = std::fs::metadata(&path)
                    .map_err(|e| RagwatchError::storage(kind, e))?
                    .len();
                if len > 0 {
                    return Ok(false);
                }
                OpenOptions::new()
                    .append(true)
                    .open(&path)
                    .map_err(|e| RagwatchError::storage(kind, e))?
            }
            Err(e) => return Err(RagwatchError::storage(kind, e)),
        };

        if let Err(e) = write_header(kind, &mut file) {
            drop(file);
            // a partial header would be read back as the column names
            if let Err(remove) = std::fs::remove_file(&path) {
                debug!(
                    kind = %kind,
                    error = %remove,
                    "could not remove uninitialized metric file"
                );
            }
            return Err(e);
        }

        debug!(kind = %kind, path = %path.display(), "metric file initialized");
        Ok(true)
    }

    /// Create every metric file that does not exist yet.
    pub fn initialize_all(&self) -> Result<()> {
        for kind in MetricKind::REPORT_ORDER {
            self.ensure_initialized(kind)?;
        }
        Ok(())
    }

    /// Append one record as a single row of its kind's file.
    ///
    /// The row is durable on the file once this returns; failures are
    /// returned to the caller, never swallowed.
    pub fn append<R: MetricRecord>(&self, record: &R) -> Result<()> {
        let kind = R::KIND;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer
            .serialize(record)
            .map_err(|e| RagwatchError::storage(kind, e))?;
        let row = writer
            .into_inner()
            .map_err(|e| RagwatchError::storage(kind, e.into_error()))?;

        let mut file = OpenOptions::new()
            .append(true)
            .open(self.path(kind))
            .map_err(|e| RagwatchError::storage(kind, e))?;
        file.write_all(&row)
            .and_then(|()| file.flush())
            .map_err(|e| RagwatchError::storage(kind, e))
    }

    /// Up to `limit` data rows of `kind`, in file order, header excluded.
    ///
    /// A missing file reads as empty. Rows are returned as stored; a row cut
    /// short by a crash comes back with fewer fields rather than being repaired,
    /// and bytes that are not UTF-8 (a character split by the cut) become U+FFFD.
    pub fn read_all(&self, kind: MetricKind, limit: usize) -> Result<Vec<Vec<String>>> {
        let Some(mut reader) = self.reader(kind)? else {
            return Ok(Vec::new());
        };
        reader
            .byte_records()
            .take(limit)
            .map(|row| {
                row.map(|r| {
                    r.iter()
                        .map(|field| String::from_utf8_lossy(field).into_owned())
                        .collect::<Vec<_>>()
                })
                .map_err(|e| RagwatchError::storage(kind, e))
            })
            .collect()
    }

    /// Up to `limit` records of type `R`, deserialized in file order.
    pub fn read_records<R>(&self, limit: usize) -> Result<Vec<R>>
    where
        R: MetricRecord + DeserializeOwned,
    {
        let kind = R::KIND;
        let Some(mut reader) = self.reader(kind)? else {
            return Ok(Vec::new());
        };
        reader
            .deserialize::<R>()
            .take(limit)
            .map(|row| row.map_err(|e| RagwatchError::storage(kind, e)))
            .collect()
    }

    /// Number of data rows stored for `kind`.
    pub fn count(&self, kind: MetricKind) -> Result<usize> {
        let Some(mut reader) = self.reader(kind)? else {
            return Ok(0);
        };
        let mut record = csv::ByteRecord::new();
        let mut rows = 0;
        while reader
            .read_byte_record(&mut record)
            .map_err(|e| RagwatchError::storage(kind, e))?
        {
            rows += 1;
        }
        Ok(rows)
    }

    fn reader(&self, kind: MetricKind) -> Result<Option<csv::Reader<File>>> {
        let file = match File::open(self.path(kind)) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RagwatchError::storage(kind, e)),
        };
        Ok(Some(
            csv::ReaderBuilder::new()
                .has_headers(true)
                .flexible(true)
                .from_reader(file),
        ))
    }
}

/// Serialize the header row of `kind` and write it in one call.
fn write_header(kind: MetricKind, out: &mut impl Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(kind.columns())
        .map_err(|e| RagwatchError::storage(kind, e))?;
    let header = writer
        .into_inner()
        .map_err(|e| RagwatchError::storage(kind, e.into_error()))?;
    out.write_all(&header)
        .and_then(|()| out.flush())
        .map_err(|e| RagwatchError::storage(kind, e))
}

impl MetricsSource for CsvStore {
    fn read_rows(&self, kind: MetricKind, limit: usize) -> Result<Vec<Vec<String>>> {
        self.read_all(kind, limit)
    }

    fn count_rows(&self, kind: MetricKind) -> Result<usize> {
        self.count(kind)
    }
}

#[cfg(test)]
mod tests {
    use ragwatch_core::{CustomEvent, LlmLatencyRecord, QueryRecord, Status};

    use super::*;

    fn event(ts: &str, event_type: &str) -> CustomEvent {
        CustomEvent {
            timestamp: ts.to_string(),
            event_type: event_type.to_string(),
            status: Status::Success,
        }
    }

    #[test]
    fn ensure_initialized_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("metrics"));

        assert!(store.ensure_initialized(MetricKind::LlmLatency).unwrap());
        for _ in 0..5 {
            assert!(!store.ensure_initialized(MetricKind::LlmLatency).unwrap());
        }

        let content = std::fs::read_to_string(store.path(MetricKind::LlmLatency)).unwrap();
        assert_eq!(
            content,
            "timestamp,model,operation,latency_seconds,status\n"
        );
    }

    #[test]
    fn ensure_initialized_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("a/b/c"));
        store.ensure_initialized(MetricKind::CustomEvents).unwrap();
        assert!(store.path(MetricKind::CustomEvents).exists());
    }

    #[test]
    fn ensure_initialized_keeps_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path());
        store.ensure_initialized(MetricKind::CustomEvents).unwrap();
        store.append(&event("t1", "pdf_processed")).unwrap();
        store.ensure_initialized(MetricKind::CustomEvents).unwrap();
        assert_eq!(store.count(MetricKind::CustomEvents).unwrap(), 1);
    }

    #[test]
    fn initialize_all_creates_every_kind() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path());
        store.initialize_all().unwrap();
        for kind in MetricKind::REPORT_ORDER {
            assert!(store.path(kind).exists(), "{kind}");
            assert_eq!(store.count(kind).unwrap(), 0);
        }
    }

    #[test]
    fn append_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path());
        store.ensure_initialized(MetricKind::CustomEvents).unwrap();
        for name in ["a", "b", "c"] {
            store.append(&event("t", name)).unwrap();
        }
        let rows = store.read_all(MetricKind::CustomEvents, 100).unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r[1].as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn append_without_file_fails_loudly() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("never-created"));
        let err = store.append(&event("t", "x")).unwrap_err();
        assert!(matches!(
            err,
            RagwatchError::Storage {
                kind: MetricKind::CustomEvents,
                ..
            }
        ));
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path());
        store.ensure_initialized(MetricKind::CustomEvents).unwrap();
        store.append(&event("t", "upload, retry")).unwrap();
        let rows = store.read_all(MetricKind::CustomEvents, 10).unwrap();
        assert_eq!(rows[0][1], "upload, retry");
        assert_eq!(rows[0].len(), 3);
    }

    #[test]
    fn read_all_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path());
        assert!(store.read_all(MetricKind::QueryProcessing, 100).unwrap().is_empty());
        assert_eq!(store.count(MetricKind::QueryProcessing).unwrap(), 0);
    }

    #[test]
    fn read_all_respects_limit() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path());
        store.ensure_initialized(MetricKind::QueryProcessing).unwrap();
        for i in 0..150 {
            store
                .append(&QueryRecord {
                    timestamp: format!("t{i}"),
                    query_type: "general".into(),
                    processing_time_seconds: 0.01,
                })
                .unwrap();
        }
        let rows = store.read_all(MetricKind::QueryProcessing, 100).unwrap();
        assert_eq!(rows.len(), 100);
        assert_eq!(rows[0][0], "t0");
        assert_eq!(rows[99][0], "t99");
        assert_eq!(store.count(MetricKind::QueryProcessing).unwrap(), 150);
    }

    #[test]
    fn typed_read_back_matches_written_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path());
        store.ensure_initialized(MetricKind::LlmLatency).unwrap();
        let written = LlmLatencyRecord {
            timestamp: "2026-10-17T09:00:00.000001".into(),
            model: "mistral".into(),
            operation: "generation".into(),
            latency_seconds: 0.42,
            status: Status::Failure,
        };
        store.append(&written).unwrap();
        let read: Vec<LlmLatencyRecord> = store.read_records(10).unwrap();
        assert_eq!(read, vec![written]);
    }

    #[test]
    fn truncated_last_row_is_returned_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path());
        store.ensure_initialized(MetricKind::CustomEvents).unwrap();
        store.append(&event("t1", "ok")).unwrap();
        let mut file = OpenOptions::new()
            .append(true)
            .open(store.path(MetricKind::CustomEvents))
            .unwrap();
        file.write_all(b"t2,half").unwrap();

        let rows = store.read_all(MetricKind::CustomEvents, 10).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["t2".to_string(), "half".to_string()]);
    }

    #[test]
    fn row_cut_inside_multibyte_character_still_reads() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path());
        store.ensure_initialized(MetricKind::CustomEvents).unwrap();
        store.append(&event("t1", "café_opened")).unwrap();
        let mut file = OpenOptions::new()
            .append(true)
            .open(store.path(MetricKind::CustomEvents))
            .unwrap();
        // "café" cut after the first byte of 'é'
        file.write_all(b"t2,caf\xc3").unwrap();

        let rows = store.read_all(MetricKind::CustomEvents, 10).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][1], "café_opened");
        assert_eq!(rows[1], vec!["t2".to_string(), "caf\u{FFFD}".to_string()]);
        assert_eq!(store.count(MetricKind::CustomEvents).unwrap(), 2);
    }

    #[test]
    fn empty_file_gets_header_before_first_row() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path());
        std::fs::write(store.path(MetricKind::LlmLatency), b"").unwrap();

        assert!(store.ensure_initialized(MetricKind::LlmLatency).unwrap());
        store
            .append(&LlmLatencyRecord {
                timestamp: "t1".into(),
                model: "mistral".into(),
                operation: "generation".into(),
                latency_seconds: 0.42,
                status: Status::Success,
            })
            .unwrap();

        let content = std::fs::read_to_string(store.path(MetricKind::LlmLatency)).unwrap();
        assert_eq!(
            content,
            "timestamp,model,operation,latency_seconds,status\nt1,mistral,generation,0.42,success\n"
        );
        assert_eq!(store.read_all(MetricKind::LlmLatency, 10).unwrap().len(), 1);
        // later calls leave the now-initialized file alone
        assert!(!store.ensure_initialized(MetricKind::LlmLatency).unwrap());
    }

    struct DiskFull;

    impl Write for DiskFull {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("no space left on device"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_header_write_is_a_storage_error() {
        let err = write_header(MetricKind::QueryProcessing, &mut DiskFull).unwrap_err();
        assert!(matches!(
            err,
            RagwatchError::Storage {
                kind: MetricKind::QueryProcessing,
                ..
            }
        ));
        assert!(err.to_string().contains("no space left"));
    }
}
