//! Index and record file persistence (index.json, result_*.json).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{RecordMeta, StoredRecord};

fn index_path(dir: &Path) -> PathBuf {
    dir.join("index.json")
}

fn record_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("result_{}.json", id))
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(super) struct IndexFile {
    pub(super) records: Vec<RecordMeta>,
}

/// Load the index. Returns an empty index when the file does not exist yet (first run).
/// Propagates IO errors (permission, disk) and JSON parse errors.
pub(super) fn load_index(dir: &Path) -> io::Result<IndexFile> {
    let data = match fs::read_to_string(index_path(dir)) {
        Ok(d) => d,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(IndexFile::default()),
        Err(e) => return Err(e),
    };
    serde_json::from_str(&data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
}

pub(super) fn save_index(dir: &Path, index: &IndexFile) -> io::Result<()> {
    let json = serde_json::to_string_pretty(index)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    write_atomic(&index_path(dir), json.as_bytes())
}

pub(super) fn read_record(dir: &Path, id: &str) -> Option<StoredRecord> {
    let data = fs::read_to_string(record_path(dir, id)).ok()?;
    serde_json::from_str(&data).ok()
}

pub(super) fn write_record(dir: &Path, record: &StoredRecord) -> io::Result<()> {
    let json = serde_json::to_string_pretty(record)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    write_atomic(&record_path(dir, &record.id), json.as_bytes())
}

/// Remove a record file. A file that is already gone counts as removed.
pub(super) fn remove_record(dir: &Path, id: &str) -> io::Result<()> {
    match fs::remove_file(record_path(dir, id)) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(tmp, path)
}
