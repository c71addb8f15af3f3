#![forbid(unsafe_code)]

pub mod blob;
pub mod history;
pub mod sqlite;
pub mod stats;

pub use blob::{BlobStore, HISTORY_KEY, InMemoryBlobStore, STATS_KEY, StorageError};
pub use history::HistoryLedger;
pub use sqlite::{SqliteBlobStore, SqliteInitError};
pub use stats::StatsStore;
