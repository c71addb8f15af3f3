use std::sync::Arc;

use portal_core::model::UserStats;

use crate::blob::{BlobStore, STATS_KEY, StorageError};

/// Persistence for the `UserStats` singleton, one JSON blob.
///
/// Missing and corrupt blobs both resolve to the seed stats; the corrupt
/// case is logged and healed on the next save.
#[derive(Clone)]
pub struct StatsStore {
    store: Arc<dyn BlobStore>,
    seed: UserStats,
}

impl StatsStore {
    #[must_use]
    pub fn new(store: Arc<dyn BlobStore>, seed: UserStats) -> Self {
        Self { store, seed }
    }

    /// Loads the persisted stats, seeding the blob on first run.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only for backend failures.
    pub async fn load(&self) -> Result<UserStats, StorageError> {
        match self.store.get(STATS_KEY).await? {
            None => {
                self.store.put(STATS_KEY, &encode(&self.seed)?).await?;
                Ok(self.seed.clone())
            }
            Some(raw) => match serde_json::from_str::<UserStats>(&raw) {
                Ok(stats) => Ok(stats),
                Err(err) => {
                    tracing::warn!(error = %err, "stats blob failed to parse; serving seed");
                    Ok(self.seed.clone())
                }
            },
        }
    }

    /// Persists the stats singleton.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    pub async fn save(&self, stats: &UserStats) -> Result<(), StorageError> {
        self.store.put(STATS_KEY, &encode(stats)?).await
    }
}

fn encode(stats: &UserStats) -> Result<String, StorageError> {
    serde_json::to_string(stats).map_err(|e| StorageError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::InMemoryBlobStore;
    use portal_core::time::fixed_now;

    #[tokio::test]
    async fn first_load_seeds_the_blob() {
        let store = InMemoryBlobStore::new();
        let stats_store = StatsStore::new(Arc::new(store.clone()), UserStats::seed());

        let stats = stats_store.load().await.unwrap();
        assert_eq!(stats.streak(), 12);
        assert_eq!(stats.points(), 2450);
        assert!(store.get(STATS_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = InMemoryBlobStore::new();
        let stats_store = StatsStore::new(Arc::new(store), UserStats::seed());

        let mut stats = stats_store.load().await.unwrap();
        stats.complete_daily_challenge(true, fixed_now().date_naive());
        stats_store.save(&stats).await.unwrap();

        let reloaded = stats_store.load().await.unwrap();
        assert_eq!(reloaded, stats);
        assert_eq!(reloaded.streak(), 13);
    }

    #[tokio::test]
    async fn corrupt_blob_falls_back_to_seed() {
        let store = InMemoryBlobStore::new();
        store.preload(STATS_KEY, "???");
        let stats_store = StatsStore::new(Arc::new(store), UserStats::seed());

        let stats = stats_store.load().await.unwrap();
        assert_eq!(stats, UserStats::seed());
    }
}
