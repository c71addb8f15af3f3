use std::sync::Arc;

use portal_core::model::{ExamId, ExamRecord};

use crate::blob::{BlobStore, HISTORY_KEY, StorageError};

/// Append-only ledger of completed sessions, most-recent-first, persisted as
/// one JSON blob.
///
/// Absence of the blob means "first run": the seed sequence is written back
/// and returned. A blob that fails to parse is treated the same way (logged,
/// seed returned) so a corrupt store never crashes the caller; the corrupt
/// blob is left in place until the next append overwrites it.
///
/// `append` is read-modify-write over the single blob. Within one process
/// this is safe because callers are serialized; concurrent writers (e.g. a
/// second tab over the same file) could lose updates. Known gap, out of
/// scope.
#[derive(Clone)]
pub struct HistoryLedger {
    store: Arc<dyn BlobStore>,
    seed: Vec<ExamRecord>,
}

impl HistoryLedger {
    #[must_use]
    pub fn new(store: Arc<dyn BlobStore>, seed: Vec<ExamRecord>) -> Self {
        Self { store, seed }
    }

    /// Returns all records, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only for backend failures; a missing or corrupt
    /// blob falls back to the seed sequence instead.
    pub async fn list(&self) -> Result<Vec<ExamRecord>, StorageError> {
        match self.store.get(HISTORY_KEY).await? {
            None => {
                self.store.put(HISTORY_KEY, &encode(&self.seed)?).await?;
                Ok(self.seed.clone())
            }
            Some(raw) => match serde_json::from_str::<Vec<ExamRecord>>(&raw) {
                Ok(records) => Ok(records),
                Err(err) => {
                    tracing::warn!(error = %err, "history blob failed to parse; serving seed");
                    Ok(self.seed.clone())
                }
            },
        }
    }

    /// Prepends a record and persists the full sequence. No dedup, no
    /// update-in-place: every submission is a new entry.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read or written.
    pub async fn append(&self, record: ExamRecord) -> Result<(), StorageError> {
        let mut records = self.list().await?;
        records.insert(0, record);
        self.store.put(HISTORY_KEY, &encode(&records)?).await
    }

    /// Number of records linked to the given weekly exam. Practice records
    /// carry no exam id and never count.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn attempts_for(&self, exam_id: &ExamId) -> Result<u32, StorageError> {
        let records = self.list().await?;
        let count = records
            .iter()
            .filter(|r| r.exam_id() == Some(exam_id))
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}

fn encode(records: &[ExamRecord]) -> Result<String, StorageError> {
    serde_json::to_string(records).map_err(|e| StorageError::Serialization(e.to_string()))
}
