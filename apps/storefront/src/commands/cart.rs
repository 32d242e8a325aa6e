//! # Cart Commands
//!
//! Cart manipulation for the signed-in owner.
//!
//! ## Add To Cart
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_to_cart(book_id)                                                   │
//! │       │                                                                 │
//! │       ├─ 1. owner = session (NOT_SIGNED_IN otherwise)                   │
//! │       ├─ 2. book  = catalog (NOT_FOUND otherwise)                       │
//! │       ├─ 3. held  = cart store quantity for (book, owner)               │
//! │       └─ 4. check_add_to_cart(book, owner, held)                        │
//! │                 │                                                       │
//! │                 ├── Accept ──► cart store +1 at current price           │
//! │                 │              ──► Added { cart }                       │
//! │                 │              (store at its ceiling: same as Reject)   │
//! │                 │                                                       │
//! │                 └── Reject ──► notice shown, timer started              │
//! │                                ──► OutOfStock { notice }                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Hitting the ceiling is a normal outcome, not an error.

use serde::Serialize;
use shelf_core::guard::{check_add_to_cart, check_quantity_update};
use shelf_core::{Book, BookId, CoreError, GuardDecision, StockNotice};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{CartView, CatalogState, ConfigState, DbState, NoticeState, SessionState};

/// What happened to an add request.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum AddToCartOutcome {
    /// One unit was added.
    Added { cart: CartView },

    /// The owner already holds the whole stock; nothing changed.
    OutOfStock { notice: StockNotice },
}

impl AddToCartOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, AddToCartOutcome::Added { .. })
    }
}

fn find_book(catalog: &CatalogState, book_id: BookId) -> Result<&Book, ApiError> {
    catalog
        .get(book_id)
        .ok_or_else(|| CoreError::BookNotFound(book_id).into())
}

async fn load_cart(
    db: &DbState,
    catalog: &CatalogState,
    config: &ConfigState,
    owner: String,
) -> Result<CartView, ApiError> {
    let lines = db.inner().carts().lines_for_owner(&owner).await?;
    Ok(CartView::build(owner, &lines, catalog, config))
}

/// Gets the owner's cart with totals.
pub async fn get_cart(
    db: &DbState,
    catalog: &CatalogState,
    session: &SessionState,
    config: &ConfigState,
) -> Result<CartView, ApiError> {
    debug!("get_cart command");
    let owner = session.require_owner().await?;
    load_cart(db, catalog, config, owner).await
}

/// Adds one unit of a book, unless the owner already holds its whole stock.
pub async fn add_to_cart(
    db: &DbState,
    catalog: &CatalogState,
    session: &SessionState,
    notices: &NoticeState,
    config: &ConfigState,
    book_id: BookId,
) -> Result<AddToCartOutcome, ApiError> {
    debug!(book_id, "add_to_cart command");

    let owner = session.require_owner().await?;
    let book = find_book(catalog, book_id)?;
    let carts = db.inner().carts();
    let held = carts.held_quantity(book_id, &owner).await?;

    let notice = match check_add_to_cart(book, &owner, held) {
        GuardDecision::Accept(increment) => match carts.increment(&increment).await? {
            Some(line) => {
                debug!(book_id, owner = %owner, quantity = line.quantity, "Added to cart");
                let cart = load_cart(db, catalog, config, owner).await?;
                return Ok(AddToCartOutcome::Added { cart });
            }
            // The stored line reached the ceiling after `held` was read
            None => StockNotice::for_book(book),
        },
        GuardDecision::Reject(notice) => notice,
    };

    let notice = notice.with_display_for(config.notice_duration);
    info!(book_id, owner = %owner, ceiling = notice.ceiling, "Stock ceiling reached");
    notices.show(notice.clone()).await;
    Ok(AddToCartOutcome::OutOfStock { notice })
}

/// Sets the quantity of a line (0 removes it).
///
/// ## Errors
/// - `INSUFFICIENT_STOCK` if `quantity` is above the book's stock
/// - `NOT_FOUND` if the owner has no line for the book
pub async fn update_cart_item(
    db: &DbState,
    catalog: &CatalogState,
    session: &SessionState,
    config: &ConfigState,
    book_id: BookId,
    quantity: u32,
) -> Result<CartView, ApiError> {
    debug!(book_id, quantity, "update_cart_item command");

    let owner = session.require_owner().await?;
    let book = find_book(catalog, book_id)?;
    check_quantity_update(book, quantity)?;

    let updated = db
        .inner()
        .carts()
        .set_quantity(book_id, &owner, quantity)
        .await?;
    if !updated {
        return Err(ApiError::not_found("Cart line", book_id));
    }

    load_cart(db, catalog, config, owner).await
}

/// Removes a line from the cart.
pub async fn remove_from_cart(
    db: &DbState,
    catalog: &CatalogState,
    session: &SessionState,
    config: &ConfigState,
    book_id: BookId,
) -> Result<CartView, ApiError> {
    debug!(book_id, "remove_from_cart command");

    let owner = session.require_owner().await?;
    if !db.inner().carts().remove(book_id, &owner).await? {
        return Err(ApiError::not_found("Cart line", book_id));
    }

    load_cart(db, catalog, config, owner).await
}

/// Removes every line from the cart.
pub async fn clear_cart(
    db: &DbState,
    catalog: &CatalogState,
    session: &SessionState,
    config: &ConfigState,
) -> Result<CartView, ApiError> {
    debug!("clear_cart command");

    let owner = session.require_owner().await?;
    let removed = db.inner().carts().clear(&owner).await?;
    info!(owner = %owner, removed, "Cart cleared");

    load_cart(db, catalog, config, owner).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{fixture, signed_in_fixture, Fixture};
    use crate::error::ErrorCode;

    async fn add(fx: &Fixture, book_id: BookId) -> Result<AddToCartOutcome, ApiError> {
        add_to_cart(&fx.db, &fx.catalog, &fx.session, &fx.notices, &fx.config, book_id).await
    }

    #[tokio::test]
    async fn test_add_stops_at_ceiling() {
        let fx = signed_in_fixture().await;

        // Dune has 2 in stock.
        let mut outcomes = Vec::new();
        for _ in 0..3 {
            outcomes.push(add(&fx, 1).await.unwrap().is_added());
        }
        assert_eq!(outcomes, [true, true, false]);

        let cart = get_cart(&fx.db, &fx.catalog, &fx.session, &fx.config).await.unwrap();
        assert_eq!(cart.totals.total_quantity, 2);
        assert_eq!(cart.totals.total_amount.cents(), 2400);

        let notice = fx.notices.current().await.unwrap();
        assert_eq!(notice.message, "Sorry, we have only 2 available");
        assert_eq!(notice.ceiling, 2);
    }

    #[tokio::test]
    async fn test_reject_carries_notice() {
        let fx = signed_in_fixture().await;
        add(&fx, 3).await.unwrap();

        match add(&fx, 3).await.unwrap() {
            AddToCartOutcome::OutOfStock { notice } => {
                assert_eq!(notice.book_id, 3);
                assert_eq!(notice.display_for, fx.config.notice_duration);
            }
            AddToCartOutcome::Added { .. } => panic!("expected out of stock"),
        }
    }

    #[tokio::test]
    async fn test_store_ceiling_below_loaded_catalog() {
        let fx = signed_in_fixture().await;

        // The stored catalog drops Dune to 1 while the loaded one still says 2.
        let mut restocked = fx.catalog.books().to_vec();
        restocked[0].amount = 1;
        fx.db.inner().books().replace_catalog(&restocked).await.unwrap();

        assert!(add(&fx, 1).await.unwrap().is_added());
        let outcome = add(&fx, 1).await.unwrap();
        assert!(!outcome.is_added());
        assert_eq!(fx.notices.current().await.unwrap().book_id, 1);

        let cart = get_cart(&fx.db, &fx.catalog, &fx.session, &fx.config).await.unwrap();
        assert_eq!(cart.totals.total_quantity, 1);
    }

    #[tokio::test]
    async fn test_add_requires_sign_in_and_known_book() {
        let fx = fixture().await;
        assert_eq!(add(&fx, 1).await.unwrap_err().code, ErrorCode::NotSignedIn);

        fx.session.sign_in("alice").await;
        assert_eq!(add(&fx, 404).await.unwrap_err().code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_carts_are_per_owner() {
        let fx = signed_in_fixture().await;
        add(&fx, 3).await.unwrap();

        fx.session.sign_in("bobby").await;
        assert!(add(&fx, 3).await.unwrap().is_added());

        let cart = get_cart(&fx.db, &fx.catalog, &fx.session, &fx.config).await.unwrap();
        assert_eq!(cart.owner, "bobby");
        assert_eq!(cart.totals.total_quantity, 1);
    }

    #[tokio::test]
    async fn test_update_cart_item() {
        let fx = signed_in_fixture().await;
        add(&fx, 2).await.unwrap();

        let cart = update_cart_item(&fx.db, &fx.catalog, &fx.session, &fx.config, 2, 3)
            .await
            .unwrap();
        assert_eq!(cart.lines[0].quantity, 3);
        assert_eq!(cart.totals.total_amount.cents(), 13500);

        let err = update_cart_item(&fx.db, &fx.catalog, &fx.session, &fx.config, 2, 4)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        let err = update_cart_item(&fx.db, &fx.catalog, &fx.session, &fx.config, 1, 1)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let cart = update_cart_item(&fx.db, &fx.catalog, &fx.session, &fx.config, 2, 0)
            .await
            .unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let fx = signed_in_fixture().await;
        add(&fx, 1).await.unwrap();
        add(&fx, 2).await.unwrap();

        let cart = remove_from_cart(&fx.db, &fx.catalog, &fx.session, &fx.config, 1)
            .await
            .unwrap();
        assert_eq!(cart.lines.len(), 1);

        let err = remove_from_cart(&fx.db, &fx.catalog, &fx.session, &fx.config, 1)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let cart = clear_cart(&fx.db, &fx.catalog, &fx.session, &fx.config).await.unwrap();
        assert!(cart.is_empty());

        // Freed stock can be added again.
        assert!(add(&fx, 1).await.unwrap().is_added());
    }
}
