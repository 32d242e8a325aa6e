//! # Catalog Seed Tool
//!
//! Imports a JSON catalog into a Shelf database.
//!
//! ```text
//! seed --db ./shelf.db                      # bundled catalog, only if empty
//! seed --db ./shelf.db --catalog books.json # replace with a file
//! seed --db ./shelf.db --force              # replace with the bundled catalog
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use shelf_db::import::{import_catalog, seed_if_empty, CatalogSource};
use shelf_db::{Database, DbConfig, DbResult};

#[derive(Debug, Parser)]
#[command(name = "seed", about = "Import a book catalog into a Shelf database")]
struct Args {
    /// Path to the SQLite database file (created if missing)
    #[arg(long, env = "SHELF_DB_PATH", default_value = "shelf.db")]
    db: PathBuf,

    /// Catalog JSON file; the bundled catalog is used when omitted
    #[arg(long, env = "SHELF_CATALOG_PATH")]
    catalog: Option<PathBuf>,

    /// Replace the catalog even if it already has books
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shelf=debug,sqlx=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    if let Err(e) = seed(&args).await {
        error!(error = %e, "Seeding failed");
        std::process::exit(1);
    }
}

async fn seed(args: &Args) -> DbResult<()> {
    let db = Database::new(DbConfig::new(args.db.clone())).await?;

    let source = match &args.catalog {
        Some(path) => CatalogSource::File(path),
        None => CatalogSource::Bundled,
    };

    let count = if args.force || args.catalog.is_some() {
        import_catalog(&db, source).await?
    } else {
        seed_if_empty(&db, source).await?
    };

    info!(count, db = %args.db.display(), "Seed complete");
    db.close().await;
    Ok(())
}
