//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Book       │   │  CartLineItem   │   │  CatalogRecord  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  book_id        │   │  JSON import    │       │
//! │  │  title, author  │   │  owner          │   │  shape, decimal │       │
//! │  │  price (Money)  │   │  unit_price     │   │  price          │       │
//! │  │  amount (stock) │   │  quantity       │   │  ──► Book       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Books are immutable for the lifetime of a catalog session. Cart lines are
//! unique per (book, owner) and are owned by the cart store.

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::validate_book;

/// Stable catalog identifier of a book.
pub type BookId = i64;

// =============================================================================
// Book
// =============================================================================

/// A book in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique, stable identifier.
    pub id: BookId,

    /// Title shown on cards and the detail view.
    pub title: String,

    pub author: String,

    /// Price in cents. Never negative.
    pub price: Money,

    /// Cover image reference. `None` means "use the placeholder".
    pub image: Option<String>,

    /// Stock ceiling: the most copies one owner may hold in a cart.
    pub amount: u32,

    /// Long description for the detail view.
    pub description: Option<String>,
}

impl Book {
    /// Creates a book without image or description.
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        price: Money,
        amount: u32,
    ) -> Self {
        Book {
            id,
            title: title.into(),
            author: author.into(),
            price,
            image: None,
            amount,
            description: None,
        }
    }

    /// Returns the cover reference, or `placeholder` when the book has none.
    ///
    /// An empty string counts as "no image".
    pub fn image_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        match self.image.as_deref() {
            Some(image) if !image.is_empty() => image,
            _ => placeholder,
        }
    }
}

// =============================================================================
// Cart Line Item
// =============================================================================

/// One book in one owner's cart.
///
/// ## Invariants
/// - `quantity > 0` (a line at zero is removed by the cart store)
/// - `quantity <= book.amount` (enforced by the [`guard`](crate::guard))
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub book_id: BookId,

    /// User name the line belongs to.
    pub owner: String,

    /// Price captured on the most recent accepted add.
    pub unit_price: Money,

    pub quantity: u32,

    /// When the line was first created.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLineItem {
    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

// =============================================================================
// Catalog Record
// =============================================================================

/// A book as it appears in a JSON catalog file.
///
/// Prices are written as decimal numbers (`12.99`) or strings (`"12.99"`) and
/// converted exactly to cents. An empty `image` string means no image.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    pub id: BookId,
    pub title: String,
    pub author: String,
    #[serde(deserialize_with = "deserialize_decimal_price")]
    pub price: Money,
    #[serde(default)]
    pub image: Option<String>,
    pub amount: u32,
    #[serde(default)]
    pub description: Option<String>,
}

impl TryFrom<CatalogRecord> for Book {
    type Error = ValidationError;

    fn try_from(record: CatalogRecord) -> Result<Self, Self::Error> {
        let book = Book {
            id: record.id,
            title: record.title,
            author: record.author,
            price: record.price,
            image: record.image.filter(|image| !image.trim().is_empty()),
            amount: record.amount,
            description: record.description.filter(|d| !d.trim().is_empty()),
        };
        validate_book(&book)?;
        Ok(book)
    }
}

fn deserialize_decimal_price<'de, D>(deserializer: D) -> Result<Money, D::Error>
where
    D: Deserializer<'de>,
{
    struct DecimalVisitor;

    impl<'de> Visitor<'de> for DecimalVisitor {
        type Value = Money;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative decimal price")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Money, E> {
            Money::from_decimal_str(&value.to_string()).map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Money, E> {
            Money::from_decimal_str(&value.to_string()).map_err(E::custom)
        }

        // f64's Display is the shortest round-tripping form, so 12.99 prints
        // as "12.99" and is parsed without float arithmetic.
        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Money, E> {
            Money::from_decimal_str(&value.to_string()).map_err(E::custom)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Money, E> {
            Money::from_decimal_str(value).map_err(E::custom)
        }
    }

    deserializer.deserialize_any(DecimalVisitor)
}

// =============================================================================
// Unit Tests
// =============================================================================
