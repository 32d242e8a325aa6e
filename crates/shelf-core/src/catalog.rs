//! # Catalog Filter
//!
//! Derives the visible book list from the full catalog, a free-text query
//! and a price bracket.
//!
//! ## Filter Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Search box: "n"          Price selector: "0-15"                        │
//! │       │                          │                                      │
//! │       └────────────┬─────────────┘                                      │
//! │                    ▼                                                    │
//! │               CatalogQuery                                              │
//! │                    │                                                    │
//! │  catalog ──────────▼──────────────────────────────────────────────────► │
//! │  [Dune, Foundation, Neuromancer]                                        │
//! │       │ title contains "n" (case-insensitive)                           │
//! │       ▼                                                                 │
//! │  [Foundation, Neuromancer]                                              │
//! │       │ price satisfies bracket                                         │
//! │       ▼                                                                 │
//! │  visible list (catalog order preserved, nothing re-sorted)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The selector is permissive: any value other than the three named brackets
//! means "no price filter".

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Book;
use crate::TITLE_DISPLAY_LIMIT;

const FIFTEEN: Money = Money::from_major(15);
const THIRTY: Money = Money::from_major(30);

// =============================================================================
// Price Bracket
// =============================================================================

/// A named price range.
///
/// | Selector | Predicate              |
/// |----------|------------------------|
/// | `all`    | always true            |
/// | `0-15`   | price ≤ 15             |
/// | `15-30`  | 15 < price ≤ 30        |
/// | `>30`    | price > 30             |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PriceBracket {
    #[default]
    All,
    UpTo15,
    From15To30,
    Over30,
}

impl PriceBracket {
    /// Every bracket, in selector order.
    pub const ALL: [PriceBracket; 4] = [
        PriceBracket::All,
        PriceBracket::UpTo15,
        PriceBracket::From15To30,
        PriceBracket::Over30,
    ];

    /// Parses a selector value, treating anything unrecognized as [`PriceBracket::All`].
    ///
    /// ```rust
    /// use shelf_core::PriceBracket;
    ///
    /// assert_eq!(PriceBracket::from_selector("0-15"), PriceBracket::UpTo15);
    /// assert_eq!(PriceBracket::from_selector("cheap"), PriceBracket::All);
    /// ```
    pub fn from_selector(value: &str) -> Self {
        Self::parse_strict(value).unwrap_or_default()
    }

    /// Parses a selector value, rejecting unknown values.
    pub fn parse_strict(value: &str) -> CoreResult<Self> {
        match value {
            "all" => Ok(PriceBracket::All),
            "0-15" => Ok(PriceBracket::UpTo15),
            "15-30" => Ok(PriceBracket::From15To30),
            ">30" => Ok(PriceBracket::Over30),
            other => Err(CoreError::InvalidBracket(other.to_string())),
        }
    }

    /// The selector string for this bracket.
    pub const fn selector(&self) -> &'static str {
        match self {
            PriceBracket::All => "all",
            PriceBracket::UpTo15 => "0-15",
            PriceBracket::From15To30 => "15-30",
            PriceBracket::Over30 => ">30",
        }
    }

    /// Whether `price` falls inside this bracket.
    pub fn contains(&self, price: Money) -> bool {
        match self {
            PriceBracket::All => true,
            PriceBracket::UpTo15 => price <= FIFTEEN,
            PriceBracket::From15To30 => price > FIFTEEN && price <= THIRTY,
            PriceBracket::Over30 => price > THIRTY,
        }
    }
}

impl fmt::Display for PriceBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

impl From<String> for PriceBracket {
    fn from(value: String) -> Self {
        PriceBracket::from_selector(&value)
    }
}

impl From<PriceBracket> for String {
    fn from(bracket: PriceBracket) -> Self {
        bracket.selector().to_string()
    }
}

// =============================================================================
// Catalog Query
// =============================================================================

/// Search text plus price bracket, as entered on the book list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    /// Case-insensitive title substring. Not trimmed.
    #[serde(default)]
    pub text: String,

    /// Serialized as its selector string.
    #[serde(default)]
    #[ts(as = "String")]
    pub bracket: PriceBracket,
}

impl CatalogQuery {
    pub fn new(text: impl Into<String>, bracket: PriceBracket) -> Self {
        CatalogQuery {
            text: text.into(),
            bracket,
        }
    }

    /// Whether any filter is applied. The "clear filters" control is only
    /// shown when this is true.
    pub fn is_active(&self) -> bool {
        !self.text.is_empty() || self.bracket != PriceBracket::All
    }

    /// Resets both the search text and the bracket.
    pub fn clear(&mut self) {
        self.text.clear();
        self.bracket = PriceBracket::All;
    }

    /// Whether `book` passes both the title and the price filter.
    pub fn matches(&self, book: &Book) -> bool {
        title_matches(&book.title, &self.text.to_lowercase()) && self.bracket.contains(book.price)
    }
}

fn title_matches(title: &str, needle_lower: &str) -> bool {
    needle_lower.is_empty() || title.to_lowercase().contains(needle_lower)
}

// =============================================================================
// Filter
// =============================================================================

/// Returns the books matching `query`, in catalog order.
///
/// ## Behavior
/// - Empty catalog ⇒ empty result
/// - Empty text matches every title
/// - Whitespace in the text is matched literally
/// - No paging: the whole filtered sequence is returned
///
/// ```rust
/// use shelf_core::catalog::{filter_catalog, CatalogQuery, PriceBracket};
/// use shelf_core::{Book, Money};
///
/// let catalog = vec![
///     Book::new(1, "Dune", "Frank Herbert", Money::from_major(12), 1),
///     Book::new(2, "Foundation", "Isaac Asimov", Money::from_major(45), 1),
///     Book::new(3, "Neuromancer", "William Gibson", Money::from_major(22), 1),
/// ];
///
/// let visible = filter_catalog(&catalog, &CatalogQuery::new("n", PriceBracket::All));
/// let titles: Vec<_> = visible.iter().map(|b| b.title.as_str()).collect();
/// assert_eq!(titles, ["Dune", "Foundation", "Neuromancer"]);
///
/// let visible = filter_catalog(&catalog, &CatalogQuery::new("ou", PriceBracket::All));
/// let titles: Vec<_> = visible.iter().map(|b| b.title.as_str()).collect();
/// assert_eq!(titles, ["Foundation"]);
/// ```
pub fn filter_catalog<'a>(books: &'a [Book], query: &CatalogQuery) -> Vec<&'a Book> {
    let needle = query.text.to_lowercase();
    books
        .iter()
        .filter(|book| title_matches(&book.title, &needle))
        .filter(|book| query.bracket.contains(book.price))
        .collect()
}

/// Shortens a title for a book card.
///
/// Titles longer than 24 characters become their first 24 characters
/// followed by `...`.
pub fn display_title(title: &str) -> String {
    match title.char_indices().nth(TITLE_DISPLAY_LIMIT) {
        Some((cut, _)) => format!("{}...", &title[..cut]),
        None => title.to_string(),
    }
}

/// Whether [`display_title`] shortens `title` (the card then offers the full
/// title on hover).
pub fn is_title_shortened(title: &str) -> bool {
    title.chars().count() > TITLE_DISPLAY_LIMIT
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: i64, title: &str, cents: i64) -> Book {
        Book::new(id, title, "Author", Money::from_cents(cents), 5)
    }

    fn sample_catalog() -> Vec<Book> {
        vec![
            book(1, "Dune", 1200),
            book(2, "Foundation", 4500),
            book(3, "Neuromancer", 2200),
        ]
    }

    fn titles<'a>(books: &[&'a Book]) -> Vec<&'a str> {
        books.iter().map(|b| b.title.as_str()).collect()
    }

    #[test]
    fn test_query_matches_case_insensitively_in_order() {
        let catalog = sample_catalog();
        let visible = filter_catalog(&catalog, &CatalogQuery::new("n", PriceBracket::All));
        assert_eq!(titles(&visible), ["Dune", "Foundation", "Neuromancer"]);

        let visible = filter_catalog(&catalog, &CatalogQuery::new("NE", PriceBracket::All));
        assert_eq!(titles(&visible), ["Dune", "Neuromancer"]);

        let visible = filter_catalog(&catalog, &CatalogQuery::new("DUNE", PriceBracket::All));
        assert_eq!(titles(&visible), ["Dune"]);
    }

    #[test]
    fn test_empty_query_with_bracket() {
        let catalog = sample_catalog();
        let visible = filter_catalog(&catalog, &CatalogQuery::new("", PriceBracket::UpTo15));
        assert_eq!(titles(&visible), ["Dune"]);

        let visible = filter_catalog(&catalog, &CatalogQuery::new("", PriceBracket::From15To30));
        assert_eq!(titles(&visible), ["Neuromancer"]);

        let visible = filter_catalog(&catalog, &CatalogQuery::new("", PriceBracket::Over30));
        assert_eq!(titles(&visible), ["Foundation"]);
    }

    #[test]
    fn test_bracket_boundaries() {
        let at_15 = Money::from_cents(1500);
        let above_15 = Money::from_cents(1501);
        let at_30 = Money::from_cents(3000);
        let above_30 = Money::from_cents(3001);

        assert!(PriceBracket::UpTo15.contains(at_15));
        assert!(!PriceBracket::UpTo15.contains(above_15));
        assert!(!PriceBracket::From15To30.contains(at_15));
        assert!(PriceBracket::From15To30.contains(above_15));
        assert!(PriceBracket::From15To30.contains(at_30));
        assert!(!PriceBracket::Over30.contains(at_30));
        assert!(PriceBracket::Over30.contains(above_30));
        assert!(PriceBracket::UpTo15.contains(Money::zero()));
    }

    #[test]
    fn test_brackets_partition_prices() {
        for cents in [0, 1, 1499, 1500, 1501, 2999, 3000, 3001, 100_000] {
            let price = Money::from_cents(cents);
            let hits = PriceBracket::ALL[1..]
                .iter()
                .filter(|b| b.contains(price))
                .count();
            assert_eq!(hits, 1, "price {cents} fell into {hits} brackets");
            assert!(PriceBracket::All.contains(price));
        }
    }

    #[test]
    fn test_unknown_selector_is_no_filter() {
        let catalog = sample_catalog();
        for selector in ["", "ALL", "40-50", "<15", "cheap"] {
            let bracket = PriceBracket::from_selector(selector);
            assert_eq!(bracket, PriceBracket::All);
            assert_eq!(
                filter_catalog(&catalog, &CatalogQuery::new("o", bracket)),
                filter_catalog(&catalog, &CatalogQuery::new("o", PriceBracket::All))
            );
        }
        assert!(matches!(
            PriceBracket::parse_strict("40-50"),
            Err(CoreError::InvalidBracket(_))
        ));
    }

    #[test]
    fn test_selector_serde() {
        let bracket: PriceBracket = serde_json::from_str("\">30\"").unwrap();
        assert_eq!(bracket, PriceBracket::Over30);
        assert_eq!(serde_json::to_string(&PriceBracket::UpTo15).unwrap(), "\"0-15\"");

        let unknown: PriceBracket = serde_json::from_str("\"luxury\"").unwrap();
        assert_eq!(unknown, PriceBracket::All);

        for bracket in PriceBracket::ALL {
            assert_eq!(PriceBracket::from_selector(&bracket.to_string()), bracket);
        }
    }

    #[test]
    fn test_whitespace_is_literal() {
        let catalog = vec![book(1, "The Hobbit", 900), book(2, "Hobbit", 900)];
        let visible = filter_catalog(&catalog, &CatalogQuery::new(" hob", PriceBracket::All));
        assert_eq!(titles(&visible), ["The Hobbit"]);

        let visible = filter_catalog(&catalog, &CatalogQuery::new("   ", PriceBracket::All));
        assert!(visible.is_empty());
    }

    #[test]
    fn test_empty_catalog() {
        let visible = filter_catalog(&[], &CatalogQuery::new("dune", PriceBracket::Over30));
        assert!(visible.is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let catalog = sample_catalog();
        for bracket in PriceBracket::ALL {
            for text in ["", "n", "o", "zzz"] {
                let query = CatalogQuery::new(text, bracket);
                let once: Vec<Book> = filter_catalog(&catalog, &query).into_iter().cloned().collect();
                let twice: Vec<Book> = filter_catalog(&once, &query).into_iter().cloned().collect();
                assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn test_matches_agrees_with_filter() {
        let catalog = sample_catalog();
        let query = CatalogQuery::new("N", PriceBracket::From15To30);
        let expected: Vec<&Book> = catalog.iter().filter(|b| query.matches(b)).collect();
        assert_eq!(filter_catalog(&catalog, &query), expected);
    }

    #[test]
    fn test_query_active_and_clear() {
        let mut query = CatalogQuery::default();
        assert!(!query.is_active());

        query.bracket = PriceBracket::Over30;
        assert!(query.is_active());

        query.text = "dune".to_string();
        query.clear();
        assert!(!query.is_active());
        assert_eq!(query, CatalogQuery::default());
    }

    #[test]
    fn test_display_title() {
        assert_eq!(display_title("Dune"), "Dune");

        let exactly_24 = "A".repeat(24);
        assert_eq!(display_title(&exactly_24), exactly_24);
        assert!(!is_title_shortened(&exactly_24));

        let long = "The Hitchhiker's Guide to the Galaxy";
        assert_eq!(display_title(long), "The Hitchhiker's Guide t...");
        assert!(is_title_shortened(long));

        let cyrillic = "Мастер и Маргарита: полное издание";
        assert_eq!(display_title(cyrillic).chars().count(), 27);
    }
}
