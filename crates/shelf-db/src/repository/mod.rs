//! # Repository Module
//!
//! Storage repositories for the storefront.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Storefront command                                                     │
//! │       │  db.carts().held_quantity(book_id, "alice")                     │
//! │       ▼                                                                 │
//! │  CartRepository ──── SQL ────► SQLite                                   │
//! │                                                                         │
//! │  SQL is isolated here; commands only see domain types.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`BookRepository`](book::BookRepository) - Catalog listing, lookup, import
//! - [`CartRepository`](cart::CartRepository) - Per-owner cart lines
//! - [`SessionRepository`](session::SessionRepository) - Stored session values

pub mod book;
pub mod cart;
pub mod session;
