use std::fmt;
use std::sync::Arc;

use portal_core::catalog::Catalog;
use portal_core::model::UserStats;
use storage::{BlobStore, HISTORY_KEY, HistoryLedger, STATS_KEY, SqliteBlobStore, StatsStore};

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    fresh: bool,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("PORTAL_DB_URL").unwrap_or_else(|_| "sqlite:portal.sqlite3".into());
        let mut fresh = false;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = args.next().ok_or(ArgsError::MissingValue { flag: "--db" })?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--fresh" => fresh = true,
                "-h" | "--help" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => return Err(ArgsError::UnknownArg(other.to_string())),
            }
        }

        Ok(Self { db_url, fresh })
    }
}

fn print_usage() {
    eprintln!("Seed the portal blob store with first-run content.");
    eprintln!();
    eprintln!("Usage: seed [--db <url>] [--fresh]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <url>   SQLite URL (default: sqlite:portal.sqlite3, env PORTAL_DB_URL)");
    eprintln!("  --fresh      Overwrite existing history/stats blobs");
    eprintln!("  -h, --help   Show this help");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let catalog = Catalog::built_in()?;
    let store = Arc::new(SqliteBlobStore::connect(&args.db_url).await?);

    if args.fresh {
        let records = vec![catalog.seed_record().clone()];
        store.put(HISTORY_KEY, &serde_json::to_string(&records)?).await?;
        store
            .put(STATS_KEY, &serde_json::to_string(&UserStats::seed())?)
            .await?;
    }

    // list/load seed the blobs when they are absent and are no-ops otherwise.
    let ledger = HistoryLedger::new(store.clone(), vec![catalog.seed_record().clone()]);
    let records = ledger.list().await?;
    let stats = StatsStore::new(store, UserStats::seed()).load().await?;

    println!(
        "Seeded {} with {} history record(s), streak {} / {} points",
        args.db_url,
        records.len(),
        stats.streak(),
        stats.points()
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
