//! # shelf-db: Local Storage Layer for the Shelf storefront
//!
//! SQLite-backed storage via sqlx. It plays three external roles for the
//! storefront core: catalog source, cart store, and session storage.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage error types
//! - [`repository`] - Book, cart and session repositories
//! - [`import`] - JSON catalog import
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shelf_db::{Database, DbConfig};
//! use shelf_db::import::{seed_if_empty, CatalogSource};
//!
//! let db = Database::new(DbConfig::new("shelf.db")).await?;
//! seed_if_empty(&db, CatalogSource::Bundled).await?;
//!
//! let catalog = db.books().list_all().await?;
//! let held = db.carts().held_quantity(catalog[0].id, "alice").await?;
//! ```

pub mod error;
pub mod import;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::book::BookRepository;
pub use repository::cart::CartRepository;
pub use repository::session::SessionRepository;
