//! Record index: metadata, per-user listing, and index mutations.

use std::collections::HashSet;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::storage;

/// Metadata for a record in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMeta {
    pub id: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Entries of `user_id`, sorted by timestamp descending.
pub(super) fn for_user(dir: &Path, user_id: &str) -> io::Result<Vec<RecordMeta>> {
    let index = storage::load_index(dir)?;
    let mut metas: Vec<RecordMeta> = index
        .records
        .into_iter()
        .filter(|m| m.user_id == user_id)
        .collect();
    metas.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(metas)
}

pub(super) fn add(dir: &Path, meta: RecordMeta) -> io::Result<()> {
    let mut index = storage::load_index(dir)?;
    index.records.retain(|m| m.id != meta.id);
    index.records.push(meta);
    storage::save_index(dir, &index)
}

/// Remove the given ids from the index. No-op when `ids` is empty.
pub(super) fn remove_all(dir: &Path, ids: &HashSet<String>) -> io::Result<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let mut index = storage::load_index(dir)?;
    index.records.retain(|m| !ids.contains(&m.id));
    storage::save_index(dir, &index)
}
