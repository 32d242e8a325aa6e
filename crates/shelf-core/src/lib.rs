//! # shelf-core: Pure Business Logic for the Shelf storefront
//!
//! This crate holds the rules of the bookstore as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shelf Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation (terminal shell / web)             │   │
//! │  │    Sign-In ──► Book List ──► Book Detail ──► Cart               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ shelf-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  catalog  │  │   guard   │  │ validation│  │   │
//! │  │   │   Book    │  │  Bracket  │  │  Accept   │  │ user name │  │   │
//! │  │   │ CartLine  │  │  filter   │  │  Reject   │  │  records  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO TIMERS • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 shelf-db (Local Storage Layer)                  │   │
//! │  │              catalog, cart lines, stored session                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Book, CartLineItem)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`catalog`] - Price brackets and the catalog filter
//! - [`guard`] - Cart quantity guard (stock ceilings)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use shelf_core::catalog::{filter_catalog, CatalogQuery, PriceBracket};
//! use shelf_core::guard::check_add_to_cart;
//! use shelf_core::{Book, Money};
//!
//! let dune = Book::new(1, "Dune", "Frank Herbert", Money::from_cents(1200), 2);
//! let catalog = vec![dune.clone()];
//!
//! let query = CatalogQuery::new("du", PriceBracket::UpTo15);
//! assert_eq!(filter_catalog(&catalog, &query).len(), 1);
//!
//! assert!(check_add_to_cart(&dune, "alice", 1).is_accept());
//! assert!(!check_add_to_cart(&dune, "alice", 2).is_accept());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod guard;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{CatalogQuery, PriceBracket};
pub use error::{CoreError, CoreResult, ValidationError};
pub use guard::{CartIncrement, GuardDecision, StockNotice};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Session storage key holding the signed-in user name.
pub const USER_NAME_KEY: &str = "userName";

/// Minimum user name length (characters).
pub const MIN_USER_NAME_LEN: usize = 4;

/// Maximum user name length (characters).
pub const MAX_USER_NAME_LEN: usize = 16;

/// Titles longer than this are shortened on book cards.
pub const TITLE_DISPLAY_LIMIT: usize = 24;

/// Highest price a catalog record may carry.
pub const MAX_BOOK_PRICE: Money = Money::from_major(1_000_000);
