//! # Catalog Import
//!
//! Loads a JSON catalog into the `books` table.
//!
//! ## Catalog File Format
//! ```json
//! [
//!   { "id": 1, "title": "Dune", "author": "Frank Herbert",
//!     "price": 12.99, "amount": 5, "image": "", "description": "..." }
//! ]
//! ```
//! File order becomes catalog order. `image` and `description` are optional;
//! an empty `image` means "use the placeholder".

use std::path::Path;
use tracing::{info, warn};

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use shelf_core::{Book, CatalogRecord};

/// Catalog bundled with the crate, used when no catalog file is configured.
pub const DEFAULT_CATALOG: &str = include_str!("../data/books.json");

/// Where a catalog comes from.
#[derive(Debug, Clone, Copy)]
pub enum CatalogSource<'a> {
    /// The bundled [`DEFAULT_CATALOG`].
    Bundled,
    /// A JSON file on disk.
    File(&'a Path),
}

/// Parses catalog JSON into validated books.
pub fn parse_catalog(json: &str) -> DbResult<Vec<Book>> {
    let records: Vec<CatalogRecord> = serde_json::from_str(json)?;
    let books = records
        .into_iter()
        .map(Book::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(books)
}

/// Reads and parses a catalog source.
pub async fn load_catalog(source: CatalogSource<'_>) -> DbResult<Vec<Book>> {
    match source {
        CatalogSource::Bundled => parse_catalog(DEFAULT_CATALOG),
        CatalogSource::File(path) => {
            let json = tokio::fs::read_to_string(path).await.map_err(|e| {
                DbError::CatalogImport(format!("cannot read {}: {}", path.display(), e))
            })?;
            parse_catalog(&json)
        }
    }
}

/// Replaces the catalog with the contents of `source`.
///
/// ## Returns
/// Number of books imported.
pub async fn import_catalog(db: &Database, source: CatalogSource<'_>) -> DbResult<usize> {
    let books = load_catalog(source).await?;
    db.books().replace_catalog(&books).await?;
    info!(count = books.len(), ?source, "Catalog imported");
    Ok(books.len())
}

/// Imports `source` only when the catalog is empty.
///
/// ## Returns
/// Number of books imported (0 when the catalog was already populated).
pub async fn seed_if_empty(db: &Database, source: CatalogSource<'_>) -> DbResult<usize> {
    let existing = db.books().count().await?;
    if existing > 0 {
        info!(existing, "Catalog already populated, skipping import");
        return Ok(0);
    }

    let imported = import_catalog(db, source).await?;
    if imported == 0 {
        warn!(?source, "Catalog source is empty");
    }
    Ok(imported)
}
