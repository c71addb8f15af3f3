use std::sync::Arc;

use portal_core::catalog::Catalog;
use portal_core::model::{ExamId, UserStats};
use storage::{BlobStore, HistoryLedger, SqliteBlobStore, StatsStore};

async fn memory_store() -> Arc<SqliteBlobStore> {
    Arc::new(
        SqliteBlobStore::connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite should connect"),
    )
}

#[tokio::test]
async fn blob_round_trip_over_sqlite() {
    let store = memory_store().await;

    assert!(store.get("missing").await.unwrap().is_none());
    store.put("k", "v1").await.unwrap();
    store.put("k", "v2").await.unwrap();
    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));
}

#[tokio::test]
async fn ledger_over_sqlite_seeds_and_appends() {
    let catalog = Catalog::built_in().unwrap();
    let store = memory_store().await;
    let ledger = HistoryLedger::new(store, vec![catalog.seed_record().clone()]);

    let records = ledger.list().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id().as_str(), "rec_init_001");

    ledger.append(catalog.seed_record().clone()).await.unwrap();
    assert_eq!(ledger.list().await.unwrap().len(), 2);

    let unknown = ExamId::new("exam_w1").unwrap();
    assert_eq!(ledger.attempts_for(&unknown).await.unwrap(), 0);
}

#[tokio::test]
async fn stats_over_sqlite_persist_across_handles() {
    let store = memory_store().await;

    let first = StatsStore::new(store.clone(), UserStats::seed());
    let mut stats = first.load().await.unwrap();
    stats.complete_daily_challenge(true, chrono::Utc::now().date_naive());
    first.save(&stats).await.unwrap();

    // A second handle over the same pool sees the saved value.
    let second = StatsStore::new(store, UserStats::seed());
    assert_eq!(second.load().await.unwrap(), stats);
}
