//! # Cart Repository
//!
//! The cart store: per-owner cart lines, one row per (book, owner).
//!
//! ## Mutation Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add to cart ──► guard Accept ──► increment()     quantity + 1          │
//! │                                                   price refreshed       │
//! │                                                   None at the ceiling   │
//! │                                                                         │
//! │  cart page ───► quantity check ─► set_quantity()  0 removes the line    │
//! │                                   remove()                              │
//! │                                   clear()                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Callers go through [`shelf_core::guard`] first. [`CartRepository::increment`]
//! also refuses to raise an existing line past the book's stored `amount`, so
//! a check that went stale between the read and the write cannot overfill a
//! line. `set_quantity` does not check ceilings.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use shelf_core::{BookId, CartIncrement, CartLineItem, Money};

#[derive(Debug, FromRow)]
struct CartRow {
    book_id: i64,
    owner: String,
    unit_price_cents: i64,
    quantity: i64,
    added_at: DateTime<Utc>,
}

impl TryFrom<CartRow> for CartLineItem {
    type Error = DbError;

    fn try_from(row: CartRow) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(row.quantity)
            .map_err(|_| DbError::corrupt("cart_items", format!("quantity {}", row.quantity)))?;

        Ok(CartLineItem {
            book_id: row.book_id,
            owner: row.owner,
            unit_price: Money::from_cents(row.unit_price_cents),
            quantity,
            added_at: row.added_at,
        })
    }
}

/// Repository for cart lines.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Quantity of `book_id` in `owner`'s cart (0 when there is no line).
    pub async fn held_quantity(&self, book_id: BookId, owner: &str) -> DbResult<u32> {
        let quantity: Option<i64> = sqlx::query_scalar(
            "SELECT quantity FROM cart_items WHERE book_id = ?1 AND owner = ?2",
        )
        .bind(book_id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        match quantity {
            None => Ok(0),
            Some(q) => u32::try_from(q)
                .map_err(|_| DbError::corrupt("cart_items", format!("quantity {q}"))),
        }
    }

    /// Applies an accepted increment: creates the line or adds to it, and
    /// records the increment's unit price on the line.
    ///
    /// ## Returns
    /// The updated line, or `None` if the line already holds the book's
    /// stored `amount` (nothing is written then).
    pub async fn increment(&self, increment: &CartIncrement) -> DbResult<Option<CartLineItem>> {
        let now = Utc::now();

        let row: Option<CartRow> = sqlx::query_as(
            r#"
            INSERT INTO cart_items (id, book_id, owner, unit_price_cents, quantity, added_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            ON CONFLICT (book_id, owner) DO UPDATE SET
                quantity = cart_items.quantity + excluded.quantity,
                unit_price_cents = excluded.unit_price_cents,
                updated_at = excluded.updated_at
            WHERE cart_items.quantity + excluded.quantity
                <= (SELECT amount FROM books WHERE id = excluded.book_id)
            RETURNING book_id, owner, unit_price_cents, quantity, added_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(increment.book_id)
        .bind(&increment.owner)
        .bind(increment.unit_price.cents())
        .bind(i64::from(increment.quantity))
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            debug!(
                book_id = increment.book_id,
                owner = %increment.owner,
                "Cart line already at stock ceiling"
            );
            return Ok(None);
        };

        debug!(
            book_id = increment.book_id,
            owner = %increment.owner,
            quantity = row.quantity,
            "Cart line incremented"
        );
        CartLineItem::try_from(row).map(Some)
    }

    /// Sets a line's quantity. Zero removes the line.
    ///
    /// ## Returns
    /// `false` if the owner has no line for the book.
    pub async fn set_quantity(&self, book_id: BookId, owner: &str, quantity: u32) -> DbResult<bool> {
        if quantity == 0 {
            return self.remove(book_id, owner).await;
        }

        let updated = sqlx::query(
            r#"
            UPDATE cart_items
            SET quantity = ?3, updated_at = ?4
            WHERE book_id = ?1 AND owner = ?2
            "#,
        )
        .bind(book_id)
        .bind(owner)
        .bind(i64::from(quantity))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }

    /// Removes a line. Returns `false` if there was none.
    pub async fn remove(&self, book_id: BookId, owner: &str) -> DbResult<bool> {
        let removed = sqlx::query("DELETE FROM cart_items WHERE book_id = ?1 AND owner = ?2")
            .bind(book_id)
            .bind(owner)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(removed > 0)
    }

    /// All of `owner`'s lines, oldest first.
    pub async fn lines_for_owner(&self, owner: &str) -> DbResult<Vec<CartLineItem>> {
        let rows: Vec<CartRow> = sqlx::query_as(
            r#"
            SELECT book_id, owner, unit_price_cents, quantity, added_at
            FROM cart_items
            WHERE owner = ?1
            ORDER BY added_at, rowid
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CartLineItem::try_from).collect()
    }

    /// Removes every line of `owner`. Returns the number of lines removed.
    pub async fn clear(&self, owner: &str) -> DbResult<u64> {
        let removed = sqlx::query("DELETE FROM cart_items WHERE owner = ?1")
            .bind(owner)
            .execute(&self.pool)
            .await?
            .rows_affected();

        debug!(owner = %owner, removed, "Cart cleared");
        Ok(removed)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use shelf_core::guard::{check_add_to_cart, GuardDecision};
    use shelf_core::Book;

    async fn db_with_books() -> (Database, Vec<Book>) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let books = vec![
            Book::new(1, "Dune", "Frank Herbert", Money::from_cents(1200), 2),
            Book::new(2, "Foundation", "Isaac Asimov", Money::from_cents(4500), 5),
        ];
        db.books().replace_catalog(&books).await.unwrap();
        (db, books)
    }

    fn increment(book: &Book, owner: &str) -> CartIncrement {
        match check_add_to_cart(book, owner, 0) {
            GuardDecision::Accept(inc) => inc,
            GuardDecision::Reject(notice) => panic!("unexpected reject: {notice:?}"),
        }
    }

    #[tokio::test]
    async fn test_increment_creates_then_adds() {
        let (db, books) = db_with_books().await;
        let carts = db.carts();

        assert_eq!(carts.held_quantity(1, "alice").await.unwrap(), 0);

        let line = carts.increment(&increment(&books[0], "alice")).await.unwrap().unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.unit_price.cents(), 1200);

        let line = carts.increment(&increment(&books[0], "alice")).await.unwrap().unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(carts.held_quantity(1, "alice").await.unwrap(), 2);
        assert_eq!(carts.held_quantity(1, "bob").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_increment_refreshes_price() {
        let (db, books) = db_with_books().await;
        let carts = db.carts();

        carts.increment(&increment(&books[1], "alice")).await.unwrap();

        let mut repriced = increment(&books[1], "alice");
        repriced.unit_price = Money::from_cents(3999);
        let line = carts.increment(&repriced).await.unwrap().unwrap();

        assert_eq!(line.quantity, 2);
        assert_eq!(line.unit_price.cents(), 3999);
    }

    #[tokio::test]
    async fn test_guarded_adds_stop_at_ceiling() {
        let (db, books) = db_with_books().await;
        let carts = db.carts();
        let dune = &books[0];

        let mut outcomes = Vec::new();
        for _ in 0..3 {
            let held = carts.held_quantity(dune.id, "alice").await.unwrap();
            let decision = check_add_to_cart(dune, "alice", held);
            if let GuardDecision::Accept(inc) = &decision {
                carts.increment(inc).await.unwrap();
            }
            outcomes.push(decision.is_accept());
        }

        assert_eq!(outcomes, [true, true, false]);
        assert_eq!(carts.held_quantity(dune.id, "alice").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_increment_refuses_past_stored_amount() {
        let (db, books) = db_with_books().await;
        let carts = db.carts();
        let dune = &books[0];

        // Three increments all checked against an empty line: two fit.
        let first = increment(dune, "alice");
        let stale = increment(dune, "alice");
        let third = increment(dune, "alice");
        assert!(carts.increment(&first).await.unwrap().is_some());
        assert!(carts.increment(&stale).await.unwrap().is_some());
        assert!(carts.increment(&third).await.unwrap().is_none());
        assert_eq!(carts.held_quantity(dune.id, "alice").await.unwrap(), 2);

        // A re-import lowering the stock stops further adds to the held line.
        let mut lowered = books.clone();
        lowered[1].amount = 1;
        db.books().replace_catalog(&lowered).await.unwrap();
        assert!(carts.increment(&increment(&books[1], "bob")).await.unwrap().is_some());
        assert!(carts.increment(&increment(&books[1], "bob")).await.unwrap().is_none());
        assert_eq!(carts.held_quantity(2, "bob").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_set_quantity_and_remove() {
        let (db, books) = db_with_books().await;
        let carts = db.carts();
        carts.increment(&increment(&books[1], "alice")).await.unwrap();

        assert!(carts.set_quantity(2, "alice", 4).await.unwrap());
        assert_eq!(carts.held_quantity(2, "alice").await.unwrap(), 4);

        assert!(!carts.set_quantity(1, "alice", 1).await.unwrap());

        assert!(carts.set_quantity(2, "alice", 0).await.unwrap());
        assert_eq!(carts.held_quantity(2, "alice").await.unwrap(), 0);
        assert!(!carts.remove(2, "alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_lines_are_per_owner_and_clearable() {
        let (db, books) = db_with_books().await;
        let carts = db.carts();
        carts.increment(&increment(&books[0], "alice")).await.unwrap();
        carts.increment(&increment(&books[1], "alice")).await.unwrap();
        carts.increment(&increment(&books[1], "bob")).await.unwrap();

        let alice = carts.lines_for_owner("alice").await.unwrap();
        let ids: Vec<BookId> = alice.iter().map(|l| l.book_id).collect();
        assert_eq!(ids, [1, 2]);

        assert_eq!(carts.clear("alice").await.unwrap(), 2);
        assert!(carts.lines_for_owner("alice").await.unwrap().is_empty());
        assert_eq!(carts.lines_for_owner("bob").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_book_is_rejected() {
        let (db, books) = db_with_books().await;
        let mut ghost = increment(&books[0], "alice");
        ghost.book_id = 404;

        let result = db.carts().increment(&ghost).await;
        assert!(matches!(result, Err(DbError::ForeignKeyViolation { .. })));
    }
}
