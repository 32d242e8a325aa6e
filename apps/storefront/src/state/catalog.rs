//! # Catalog State
//!
//! The full, ordered book catalog. It is read from the database once at
//! startup and never changes while the storefront runs; the Catalog Filter
//! only ever borrows it.

use std::sync::Arc;

use shelf_core::{Book, BookId};
use shelf_db::import::{seed_if_empty, CatalogSource};
use shelf_db::{Database, DbResult};
use tracing::info;

use super::ConfigState;

#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    books: Arc<Vec<Book>>,
}

impl CatalogState {
    pub fn new(books: Vec<Book>) -> Self {
        CatalogState {
            books: Arc::new(books),
        }
    }

    /// Loads the catalog, importing the configured source first when the
    /// books table is empty.
    pub async fn load(db: &Database, config: &ConfigState) -> DbResult<Self> {
        let source = match &config.catalog_path {
            Some(path) => CatalogSource::File(path),
            None => CatalogSource::Bundled,
        };
        seed_if_empty(db, source).await?;

        let books = db.books().list_all().await?;
        info!(count = books.len(), "Catalog loaded");
        Ok(CatalogState::new(books))
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
