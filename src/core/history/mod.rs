//! Per-user quiz result history in ~/.local/share/quizmaster/results/.

mod index;
mod storage;

pub use index::RecordMeta;

use std::collections::HashSet;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::paths;
use crate::core::quiz::Difficulty;

/// Deletions per index update when pruning.
pub const PRUNE_BATCH_SIZE: usize = 100;

/// One finished quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizRecord {
    pub topic: String,
    pub score: usize,
    pub total_questions: usize,
    pub difficulty: Difficulty,
    pub timestamp: DateTime<Utc>,
}

/// A record as stored, with its id and owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: String,
    pub user_id: String,
    #[serde(flatten)]
    pub record: QuizRecord,
}

/// File-backed result store rooted at one directory.
pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn default_location() -> io::Result<Self> {
        paths::data_dir()
            .map(Self::open)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No data directory"))
    }

    /// Persist a record for `user_id`. Returns the new record id.
    pub fn save_record(&self, user_id: &str, record: QuizRecord) -> io::Result<String> {
        if user_id.trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "User id cannot be empty",
            ));
        }
        let stored = StoredRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            record,
        };
        storage::write_record(&self.dir, &stored)?;
        index::add(
            &self.dir,
            RecordMeta {
                id: stored.id.clone(),
                user_id: stored.user_id.clone(),
                timestamp: stored.record.timestamp,
            },
        )?;
        log::debug!("Saved quiz result {} for {}", stored.id, user_id);
        Ok(stored.id)
    }

    /// Records of `user_id`, newest first. Unreadable record files are skipped.
    pub fn list_records(&self, user_id: &str) -> io::Result<Vec<StoredRecord>> {
        let metas = index::for_user(&self.dir, user_id)?;
        Ok(metas
            .iter()
            .filter_map(|meta| {
                let record = storage::read_record(&self.dir, &meta.id);
                if record.is_none() {
                    log::warn!("Skipping unreadable quiz result {}", meta.id);
                }
                record
            })
            .filter(|r| r.user_id == user_id)
            .collect())
    }

    /// Delete all but the `keep` newest records of `user_id`, in batches.
    ///
    /// Best effort: a batch whose index update fails is logged and skipped. Entries still in the
    /// index are retried on the next call. Returns the surviving records, newest first.
    pub fn prune_to_most_recent(&self, user_id: &str, keep: usize) -> io::Result<Vec<StoredRecord>> {
        let metas = index::for_user(&self.dir, user_id)?;
        if metas.len() > keep {
            let to_delete = &metas[keep..];
            log::info!("Pruning {} old quiz results for {}", to_delete.len(), user_id);
            for batch in to_delete.chunks(PRUNE_BATCH_SIZE) {
                if let Err(e) = self.delete_batch(user_id, batch) {
                    log::warn!("Batch delete attempt failed: {}", e);
                }
            }
        }
        let mut survivors = self.list_records(user_id)?;
        survivors.truncate(keep);
        Ok(survivors)
    }

    /// Remove the files of one batch, then drop the deleted entries from the index.
    fn delete_batch(&self, user_id: &str, batch: &[RecordMeta]) -> io::Result<()> {
        let mut deleted = HashSet::new();
        for meta in batch.iter().filter(|m| m.user_id == user_id) {
            match storage::remove_record(&self.dir, &meta.id) {
                Ok(()) => {
                    deleted.insert(meta.id.clone());
                }
                Err(e) => log::warn!("Failed to remove quiz result {}: {}", meta.id, e),
            }
        }
        index::remove_all(&self.dir, &deleted)
    }
}
