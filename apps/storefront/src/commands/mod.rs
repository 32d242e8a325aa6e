//! # Storefront Commands
//!
//! Every action the storefront offers, as an async function over the state
//! it needs.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── session.rs  ◄─── restore_session, sign_in, sign_out
//! ├── catalog.rs  ◄─── list_books, get_book
//! ├── cart.rs     ◄─── get_cart, add_to_cart, update/remove/clear
//! └── notice.rs   ◄─── current_notice, dismiss_notice
//! ```
//!
//! ## State Injection
//! ```rust,ignore
//! // Only needs the session store and session state
//! async fn sign_in(db: &DbState, session: &SessionState, name: String)
//!
//! // Catalog reads come from memory; the cart store only supplies badges
//! async fn list_books(db: &DbState, catalog: &CatalogState, session: &SessionState, ...)
//!
//! // The guarded add needs everything
//! async fn add_to_cart(db, catalog, session, notices, config, book_id)
//! ```

pub mod cart;
pub mod catalog;
pub mod notice;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support {
    use shelf_core::{Book, Money};
    use shelf_db::{Database, DbConfig};

    use crate::state::{CatalogState, ConfigState, DbState, NoticeState, SessionState};

    pub struct Fixture {
        pub db: DbState,
        pub catalog: CatalogState,
        pub session: SessionState,
        pub notices: NoticeState,
        pub config: ConfigState,
    }

    /// Dune (12.00, 2 in stock), Foundation (45.00, 3), Neuromancer (22.00, 1).
    pub async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let books = vec![
            Book::new(1, "Dune", "Frank Herbert", Money::from_major(12), 2),
            Book::new(2, "Foundation", "Isaac Asimov", Money::from_major(45), 3),
            Book::new(3, "Neuromancer", "William Gibson", Money::from_major(22), 1),
        ];
        db.books().replace_catalog(&books).await.unwrap();

        Fixture {
            db: DbState::new(db),
            catalog: CatalogState::new(books),
            session: SessionState::new(),
            notices: NoticeState::new(),
            config: ConfigState::default(),
        }
    }

    pub async fn signed_in_fixture() -> Fixture {
        let fx = fixture().await;
        fx.session.sign_in("alice").await;
        fx
    }
}
