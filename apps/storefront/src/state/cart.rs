//! # Cart View
//!
//! Presentation model of an owner's cart. The lines themselves live in the
//! cart store (`shelf_db::CartRepository`); this module joins them with the
//! catalog and computes totals.
//!
//! ## Cart Page
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CART (alice)                                          3 items          │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  Dune                    x2     $12.00        $24.00                    │
//! │  Neuromancer             x1     $22.00        $22.00                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  TOTAL                                        $46.00                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use shelf_core::catalog::display_title;
use shelf_core::{BookId, CartLineItem, Money};
use tracing::warn;

use super::{CatalogState, ConfigState};

/// Title shown for a cart line whose book is no longer in the catalog.
pub const UNAVAILABLE_TITLE: &str = "Unavailable book";

/// One cart line with the book details the cart page shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub image: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub line_total: Money,

    /// Stock ceiling, the upper bound of the quantity control
    pub available: u32,

    pub added_at: DateTime<Utc>,
}

/// Cart aggregates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Number of distinct books
    pub item_count: usize,

    /// Sum of quantities
    pub total_quantity: u64,

    /// Sum of quantity × unit price
    pub total_amount: Money,
}

impl CartTotals {
    pub fn from_lines(lines: &[CartLineItem]) -> Self {
        CartTotals {
            item_count: lines.len(),
            total_quantity: lines.iter().map(|l| u64::from(l.quantity)).sum(),
            total_amount: lines.iter().map(CartLineItem::line_total).sum(),
        }
    }
}

/// Cart response including lines and totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub owner: String,
    pub lines: Vec<CartLineView>,
    pub totals: CartTotals,
}

impl CartView {
    /// Joins cart lines with catalog entries, one view per line.
    ///
    /// A line whose book is missing from the loaded catalog is shown as
    /// [`UNAVAILABLE_TITLE`] with no stock, so `lines` and `totals` always
    /// cover the same lines.
    pub fn build(
        owner: String,
        lines: &[CartLineItem],
        catalog: &CatalogState,
        config: &ConfigState,
    ) -> Self {
        let views = lines
            .iter()
            .map(|line| {
                let (title, author, image, available) = match catalog.get(line.book_id) {
                    Some(book) => (
                        display_title(&book.title),
                        book.author.clone(),
                        book.image_or(&config.placeholder_image).to_string(),
                        book.amount,
                    ),
                    None => {
                        warn!(book_id = line.book_id, "Cart line references unknown book");
                        (
                            UNAVAILABLE_TITLE.to_string(),
                            String::new(),
                            config.placeholder_image.clone(),
                            0,
                        )
                    }
                };
                CartLineView {
                    book_id: line.book_id,
                    title,
                    author,
                    image,
                    unit_price: line.unit_price,
                    quantity: line.quantity,
                    line_total: line.line_total(),
                    available,
                    added_at: line.added_at,
                }
            })
            .collect();

        CartView {
            owner,
            lines: views,
            totals: CartTotals::from_lines(lines),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.totals.item_count == 0
    }
}
