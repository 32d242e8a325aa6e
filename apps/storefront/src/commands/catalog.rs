//! # Catalog Commands
//!
//! Browsing: the filtered book list and the single-book detail view.
//!
//! ## Catalog Page
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Search: [ n          ]   Price: [ all ▼ ]          [ clear filters ]   │
//! │                                                      (only if active)   │
//! │  ┌────────────┐ ┌────────────┐ ┌────────────┐                           │
//! │  │ Dune   (1) │ │ Foundation │ │ Neuromancer│  list_books("n", "all")   │
//! │  │ $12.00     │ │ $45.00     │ │ $22.00     │   ├─► filter_catalog      │
//! │  │ [add]      │ │ [add]      │ │ [add]      │   └─► held per book       │
//! │  └────────────┘ └────────────┘ └────────────┘                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both commands require a signed-in user.

use std::collections::HashMap;

use serde::Serialize;
use shelf_core::catalog::{display_title, filter_catalog, is_title_shortened};
use shelf_core::{Book, BookId, CatalogQuery, CoreError, Money, PriceBracket};
use tracing::debug;

use crate::error::ApiError;
use crate::state::{CatalogState, ConfigState, DbState, SessionState};

/// A book as shown on a catalog card.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookCard {
    pub id: BookId,

    /// Title shortened for the card
    pub title: String,

    /// Full title (hover text when `title` is shortened)
    pub full_title: String,
    pub title_shortened: bool,

    pub author: String,
    pub price: Money,
    pub price_label: String,
    pub image: String,

    /// Quantity of this book in the owner's cart (the card badge)
    pub in_cart: u32,
}

impl BookCard {
    fn from_book(book: &Book, config: &ConfigState, in_cart: u32) -> Self {
        BookCard {
            id: book.id,
            title: display_title(&book.title),
            full_title: book.title.clone(),
            title_shortened: is_title_shortened(&book.title),
            author: book.author.clone(),
            price: book.price,
            price_label: config.format_currency(book.price),
            image: book.image_or(&config.placeholder_image).to_string(),
            in_cart,
        }
    }
}

/// Result of a catalog query.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    pub books: Vec<BookCard>,

    /// The query after bracket resolution (unknown selectors become `all`)
    pub query: CatalogQuery,

    /// Whether the "clear filters" control is shown
    pub filters_active: bool,

    /// Size of the unfiltered catalog
    pub catalog_size: usize,
}

/// Full book detail view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDetail {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub price: Money,
    pub price_label: String,
    pub image: String,
    pub description: Option<String>,

    /// Stock ceiling
    pub amount: u32,
}

/// Lists the books matching `text` and the `bracket` selector.
///
/// ## Arguments
/// * `text` - Case-insensitive title substring; taken literally (no trimming)
/// * `bracket` - `all`, `0-15`, `15-30` or `>30`; anything else means `all`
///
/// Each card carries the signed-in owner's held quantity of that book.
pub async fn list_books(
    db: &DbState,
    catalog: &CatalogState,
    session: &SessionState,
    config: &ConfigState,
    text: String,
    bracket: String,
) -> Result<CatalogPage, ApiError> {
    debug!(text = %text, bracket = %bracket, "list_books command");

    let owner = session.require_owner().await?;
    let held: HashMap<BookId, u32> = db
        .inner()
        .carts()
        .lines_for_owner(&owner)
        .await?
        .into_iter()
        .map(|line| (line.book_id, line.quantity))
        .collect();

    let query = CatalogQuery::new(text, PriceBracket::from_selector(&bracket));
    let books = filter_catalog(catalog.books(), &query)
        .into_iter()
        .map(|book| {
            let in_cart = held.get(&book.id).copied().unwrap_or(0);
            BookCard::from_book(book, config, in_cart)
        })
        .collect();

    Ok(CatalogPage {
        books,
        filters_active: query.is_active(),
        query,
        catalog_size: catalog.len(),
    })
}

/// Gets one book's detail view.
pub async fn get_book(
    catalog: &CatalogState,
    session: &SessionState,
    config: &ConfigState,
    book_id: BookId,
) -> Result<BookDetail, ApiError> {
    debug!(book_id, "get_book command");

    session.require_owner().await?;
    let book = catalog.get(book_id).ok_or(CoreError::BookNotFound(book_id))?;

    Ok(BookDetail {
        id: book.id,
        title: book.title.clone(),
        author: book.author.clone(),
        price: book.price,
        price_label: config.format_currency(book.price),
        image: book.image_or(&config.placeholder_image).to_string(),
        description: book.description.clone(),
        amount: book.amount,
    })
}
