//! Service wiring: one bundle owning the catalog, the stores, and the flow
//! services, shared by handle.

use std::sync::Arc;

use portal_core::Clock;
use portal_core::catalog::Catalog;
use portal_core::model::UserStats;
use storage::{BlobStore, HistoryLedger, InMemoryBlobStore, SqliteBlobStore, StatsStore};

use crate::challenge::DailyChallengeService;
use crate::error::PortalInitError;
use crate::sessions::AssessmentService;

/// The assembled application services. Cheap to clone; all members share
/// the same blob store underneath.
#[derive(Clone)]
pub struct PortalServices {
    catalog: Arc<Catalog>,
    ledger: HistoryLedger,
    stats: StatsStore,
    assessments: AssessmentService,
    challenge: DailyChallengeService,
}

impl PortalServices {
    /// Wires everything over an in-memory blob store. Used by tests and
    /// ephemeral sessions.
    ///
    /// # Errors
    ///
    /// Returns `PortalInitError` if the built-in catalog fails validation.
    pub fn in_memory(clock: Clock) -> Result<Self, PortalInitError> {
        Self::with_store(Arc::new(InMemoryBlobStore::new()), clock)
    }

    /// Wires everything over a `SQLite`-backed blob store.
    ///
    /// # Errors
    ///
    /// Returns `PortalInitError` if the database cannot be opened or the
    /// catalog fails validation.
    pub async fn sqlite(database_url: &str, clock: Clock) -> Result<Self, PortalInitError> {
        let store = Arc::new(SqliteBlobStore::connect(database_url).await?);
        Self::with_store(store, clock)
    }

    /// Wires the services over any blob store.
    ///
    /// # Errors
    ///
    /// Returns `PortalInitError` if the built-in catalog fails validation.
    pub fn with_store(store: Arc<dyn BlobStore>, clock: Clock) -> Result<Self, PortalInitError> {
        let catalog = Arc::new(Catalog::built_in()?);
        let ledger = HistoryLedger::new(store.clone(), vec![catalog.seed_record().clone()]);
        let stats = StatsStore::new(store, UserStats::seed());

        let assessments = AssessmentService::new(clock, catalog.clone(), ledger.clone());
        let challenge = DailyChallengeService::new(clock, catalog.clone(), stats.clone());

        Ok(Self {
            catalog,
            ledger,
            stats,
            assessments,
            challenge,
        })
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    #[must_use]
    pub fn history(&self) -> &HistoryLedger {
        &self.ledger
    }

    #[must_use]
    pub fn stats(&self) -> &StatsStore {
        &self.stats
    }

    #[must_use]
    pub fn assessments(&self) -> &AssessmentService {
        &self.assessments
    }

    #[must_use]
    pub fn challenge(&self) -> &DailyChallengeService {
        &self.challenge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::time::fixed_clock;

    #[tokio::test]
    async fn in_memory_bundle_serves_the_seeded_history() {
        let services = PortalServices::in_memory(fixed_clock()).unwrap();
        let records = services.history().list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id().as_str(), "rec_init_001");
    }

    #[tokio::test]
    async fn members_share_one_store() {
        let services = PortalServices::in_memory(fixed_clock()).unwrap();
        services.challenge().complete("6").await.unwrap();

        let stats = services.stats().load().await.unwrap();
        assert_eq!(stats.streak(), 13);
    }
}
