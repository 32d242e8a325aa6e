//! # State Module
//!
//! One focused state type per concern. Each command takes only the states it
//! needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌──────────────┐    │
//! │  │   DbState    │ │ CatalogState │ │ SessionState │ │ NoticeState  │    │
//! │  │              │ │              │ │              │ │              │    │
//! │  │  Database    │ │  Arc<Vec<    │ │  RwLock<     │ │  Mutex<slot> │    │
//! │  │  (SQLite     │ │    Book>>    │ │   Option<    │ │  + timer     │    │
//! │  │   pool)      │ │  read-only   │ │   owner>>    │ │    task      │    │
//! │  └──────────────┘ └──────────────┘ └──────────────┘ └──────────────┘    │
//! │                                                                         │
//! │  ConfigState: read-only after startup                                   │
//! │  CartView: built per request from the cart store                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod catalog;
mod config;
mod db;
mod notice;
mod session;

pub use cart::{CartLineView, CartTotals, CartView};
pub use catalog::CatalogState;
pub use config::{ConfigError, ConfigState, DEFAULT_PLACEHOLDER_IMAGE};
pub use db::DbState;
pub use notice::NoticeState;
pub use session::SessionState;
