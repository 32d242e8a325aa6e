//! # Book Repository
//!
//! The catalog source: a fixed, ordered sequence of books.
//!
//! Catalog order is the `position` column, assigned from the import order.
//! Filtering is NOT done here; the storefront loads the whole catalog once
//! and runs [`shelf_core::catalog::filter_catalog`] over it.

use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use shelf_core::validation::validate_catalog;
use shelf_core::{Book, BookId, Money};

/// Row shape of the `books` table.
#[derive(Debug, FromRow)]
struct BookRow {
    id: i64,
    title: String,
    author: String,
    price_cents: i64,
    image: Option<String>,
    amount: i64,
    description: Option<String>,
}

impl TryFrom<BookRow> for Book {
    type Error = DbError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        let amount = u32::try_from(row.amount)
            .map_err(|_| DbError::corrupt("books", format!("amount {} for book {}", row.amount, row.id)))?;

        Ok(Book {
            id: row.id,
            title: row.title,
            author: row.author,
            price: Money::from_cents(row.price_cents),
            image: row.image,
            amount,
            description: row.description,
        })
    }
}

const SELECT_BOOK: &str = r#"
    SELECT id, title, author, price_cents, image, amount, description
    FROM books
"#;

/// Repository for catalog operations.
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        BookRepository { pool }
    }

    /// Returns the whole catalog in catalog order.
    pub async fn list_all(&self) -> DbResult<Vec<Book>> {
        let rows: Vec<BookRow> = sqlx::query_as(&format!("{SELECT_BOOK} ORDER BY position, id"))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Loaded catalog");
        rows.into_iter().map(Book::try_from).collect()
    }

    /// Gets a book by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Book))` - Book found
    /// * `Ok(None)` - Book not found
    pub async fn get_by_id(&self, id: BookId) -> DbResult<Option<Book>> {
        let row: Option<BookRow> = sqlx::query_as(&format!("{SELECT_BOOK} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Book::try_from).transpose()
    }

    /// Counts books in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Replaces the catalog with `books`, in the given order.
    ///
    /// ## How It Works
    /// ```text
    /// 1. Validate every book and id uniqueness (nothing written on failure)
    /// 2. BEGIN
    /// 3. Mark every existing row stale (position = -1)
    /// 4. Upsert each new book with its position
    /// 5. Delete rows still stale (cascades to their cart lines)
    /// 6. COMMIT
    /// ```
    /// Books that survive the import keep their cart lines.
    pub async fn replace_catalog(&self, books: &[Book]) -> DbResult<()> {
        validate_catalog(books)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE books SET position = -1")
            .execute(&mut *tx)
            .await?;

        for (position, book) in books.iter().enumerate() {
            let position = i64::try_from(position).map_err(|e| DbError::Internal(e.to_string()))?;
            sqlx::query(
                r#"
                INSERT INTO books (id, position, title, author, price_cents, image, amount, description)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT (id) DO UPDATE SET
                    position = excluded.position,
                    title = excluded.title,
                    author = excluded.author,
                    price_cents = excluded.price_cents,
                    image = excluded.image,
                    amount = excluded.amount,
                    description = excluded.description
                "#,
            )
            .bind(book.id)
            .bind(position)
            .bind(&book.title)
            .bind(&book.author)
            .bind(book.price.cents())
            .bind(&book.image)
            .bind(i64::from(book.amount))
            .bind(&book.description)
            .execute(&mut *tx)
            .await?;
        }

        let removed = sqlx::query("DELETE FROM books WHERE position < 0")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        info!(count = books.len(), removed, "Catalog replaced");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn book(id: BookId, title: &str, cents: i64, amount: u32) -> Book {
        Book::new(id, title, "Author", Money::from_cents(cents), amount)
    }

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_replace_and_list_preserves_order() {
        let db = db().await;
        let catalog = vec![
            book(30, "Neuromancer", 2200, 4),
            book(10, "Dune", 1200, 2),
            book(20, "Foundation", 4500, 1),
        ];
        db.books().replace_catalog(&catalog).await.unwrap();

        let loaded = db.books().list_all().await.unwrap();
        assert_eq!(loaded, catalog);
        assert_eq!(db.books().count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = db().await;
        let mut dune = book(1, "Dune", 1200, 2);
        dune.image = Some("dune.jpg".to_string());
        dune.description = Some("Desert planet".to_string());
        db.books().replace_catalog(&[dune.clone()]).await.unwrap();

        assert_eq!(db.books().get_by_id(1).await.unwrap(), Some(dune));
        assert_eq!(db.books().get_by_id(99).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reimport_drops_missing_books_only() {
        let db = db().await;
        db.books()
            .replace_catalog(&[book(1, "Dune", 1200, 2), book(2, "Foundation", 4500, 1)])
            .await
            .unwrap();

        db.books()
            .replace_catalog(&[book(2, "Foundation (2nd ed.)", 4700, 3)])
            .await
            .unwrap();

        let loaded = db.books().list_all().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "Foundation (2nd ed.)");
        assert_eq!(loaded[0].amount, 3);
    }

    #[tokio::test]
    async fn test_invalid_catalog_writes_nothing() {
        let db = db().await;
        let result = db
            .books()
            .replace_catalog(&[book(1, "Dune", 1200, 2), book(1, "Dune again", 1200, 2)])
            .await;

        assert!(matches!(result, Err(DbError::InvalidCatalog(_))));
        assert_eq!(db.books().count().await.unwrap(), 0);
    }
}
