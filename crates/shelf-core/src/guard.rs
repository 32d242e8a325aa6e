//! # Cart Quantity Guard
//!
//! Decides whether an "add to cart" request may go through, based on the
//! book's stock ceiling and the quantity the owner already holds.
//!
//! ## Decision Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  User clicks "add to cart" on a book card                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  held = cart store: quantity of (book, owner)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  check_add_to_cart(book, owner, held) ← THIS MODULE                     │
//! │       │                                                                 │
//! │       ├── held <  amount ──► Accept(CartIncrement)                      │
//! │       │                      cart store adds exactly 1 at current price │
//! │       │                                                                 │
//! │       └── held >= amount ──► Reject(StockNotice)                        │
//! │                              no mutation; "only N available" notice     │
//! │                              shown for ~2 seconds                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The guard is stateless and performs no I/O. Applying the increment and
//! running the notice timer belong to the caller.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Book, BookId};

/// How long a stock notice stays visible unless dismissed.
pub const STOCK_NOTICE_DURATION: Duration = Duration::from_secs(2);

// =============================================================================
// Decision Types
// =============================================================================

/// A request to add one unit of a book to an owner's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartIncrement {
    pub book_id: BookId,
    pub owner: String,

    /// Price to record on the cart line.
    pub unit_price: Money,

    /// Always 1.
    pub quantity: u32,
}

/// User-facing notice for an add that hit the stock ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockNotice {
    pub book_id: BookId,

    /// The book's stock ceiling.
    pub ceiling: u32,

    pub message: String,

    /// Requested display time before auto-dismissal.
    #[serde(with = "duration_millis")]
    #[ts(as = "u64")]
    pub display_for: Duration,
}

impl StockNotice {
    /// The notice for a book whose whole stock is already held.
    pub fn for_book(book: &Book) -> Self {
        StockNotice {
            book_id: book.id,
            ceiling: book.amount,
            message: format!("Sorry, we have only {} available", book.amount),
            display_for: STOCK_NOTICE_DURATION,
        }
    }

    /// Overrides the display time (configurable in the storefront).
    pub fn with_display_for(mut self, display_for: Duration) -> Self {
        self.display_for = display_for;
        self
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Accept(CartIncrement),
    Reject(StockNotice),
}

impl GuardDecision {
    pub fn is_accept(&self) -> bool {
        matches!(self, GuardDecision::Accept(_))
    }
}

// =============================================================================
// Guard Checks
// =============================================================================

/// Checks a single "add one copy" request.
///
/// ## Rules
/// - `held < book.amount` ⇒ Accept, one unit at `book.price`
/// - `held == book.amount` ⇒ Reject with a notice naming the ceiling
/// - `held > book.amount` cannot happen through this guard; it is rejected
///   the same way so the line never grows further
///
/// ```rust
/// use shelf_core::guard::{check_add_to_cart, GuardDecision};
/// use shelf_core::{Book, Money};
///
/// let book = Book::new(1, "Dune", "Frank Herbert", Money::from_major(12), 2);
///
/// match check_add_to_cart(&book, "alice", 2) {
///     GuardDecision::Reject(notice) => assert!(notice.message.contains("only 2 available")),
///     GuardDecision::Accept(_) => unreachable!(),
/// }
/// ```
pub fn check_add_to_cart(book: &Book, owner: &str, held: u32) -> GuardDecision {
    if held >= book.amount {
        return GuardDecision::Reject(StockNotice::for_book(book));
    }

    GuardDecision::Accept(CartIncrement {
        book_id: book.id,
        owner: owner.to_string(),
        unit_price: book.price,
        quantity: 1,
    })
}

/// Checks an explicit quantity change from the cart page.
///
/// Zero (removal) is always allowed; anything above the ceiling is refused.
pub fn check_quantity_update(book: &Book, requested: u32) -> CoreResult<()> {
    if requested > book.amount {
        return Err(CoreError::InsufficientStock {
            book_id: book.id,
            available: book.amount,
            requested,
        });
    }
    Ok(())
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn book(amount: u32) -> Book {
        Book::new(42, "Dune", "Frank Herbert", Money::from_cents(1200), amount)
    }

    /// Minimal cart store: (book, owner) → held quantity.
    #[derive(Default)]
    struct Ledger(HashMap<(BookId, String), u32>);

    impl Ledger {
        fn held(&self, book_id: BookId, owner: &str) -> u32 {
            self.0.get(&(book_id, owner.to_string())).copied().unwrap_or(0)
        }

        fn add(&mut self, book: &Book, owner: &str) -> GuardDecision {
            let decision = check_add_to_cart(book, owner, self.held(book.id, owner));
            if let GuardDecision::Accept(inc) = &decision {
                *self.0.entry((inc.book_id, inc.owner.clone())).or_default() += inc.quantity;
            }
            decision
        }
    }

    #[test]
    fn test_accept_records_one_unit_at_current_price() {
        let book = book(3);
        let decision = check_add_to_cart(&book, "alice", 0);
        assert_eq!(
            decision,
            GuardDecision::Accept(CartIncrement {
                book_id: 42,
                owner: "alice".to_string(),
                unit_price: Money::from_cents(1200),
                quantity: 1,
            })
        );
    }

    #[test]
    fn test_two_copies_then_reject() {
        let book = book(2);
        let mut ledger = Ledger::default();

        let outcomes: Vec<bool> = (0..3).map(|_| ledger.add(&book, "alice").is_accept()).collect();
        assert_eq!(outcomes, [true, true, false]);
        assert_eq!(ledger.held(book.id, "alice"), 2);

        match ledger.add(&book, "alice") {
            GuardDecision::Reject(notice) => {
                assert_eq!(notice.ceiling, 2);
                assert!(notice.message.contains("only 2 available"));
                assert_eq!(notice.display_for, STOCK_NOTICE_DURATION);
            }
            other => panic!("expected reject, got {other:?}"),
        }
        assert_eq!(ledger.held(book.id, "alice"), 2);
    }

    #[test]
    fn test_exactly_ceiling_accepts_for_any_ceiling() {
        for ceiling in [0, 1, 5, 17] {
            let book = book(ceiling);
            let mut ledger = Ledger::default();
            let accepted = (0..ceiling + 5)
                .map(|_| ledger.add(&book, "bob"))
                .take_while(GuardDecision::is_accept)
                .count();
            assert_eq!(accepted as u32, ceiling);
            assert_eq!(ledger.held(book.id, "bob"), ceiling);
        }
    }

    #[test]
    fn test_owners_are_independent() {
        let book = book(1);
        let mut ledger = Ledger::default();
        assert!(ledger.add(&book, "alice").is_accept());
        assert!(!ledger.add(&book, "alice").is_accept());
        assert!(ledger.add(&book, "carol").is_accept());
    }

    #[test]
    fn test_over_ceiling_fails_safe() {
        let book = book(2);
        assert!(matches!(
            check_add_to_cart(&book, "alice", 7),
            GuardDecision::Reject(_)
        ));
    }

    #[test]
    fn test_reject_resumes_after_external_reduction() {
        let book = book(1);
        let mut ledger = Ledger::default();
        assert!(ledger.add(&book, "alice").is_accept());
        assert!(!ledger.add(&book, "alice").is_accept());

        ledger.0.clear();
        assert!(ledger.add(&book, "alice").is_accept());
    }

    #[test]
    fn test_quantity_update() {
        let book = book(3);
        assert!(check_quantity_update(&book, 0).is_ok());
        assert!(check_quantity_update(&book, 3).is_ok());
        assert!(matches!(
            check_quantity_update(&book, 4),
            Err(CoreError::InsufficientStock {
                available: 3,
                requested: 4,
                ..
            })
        ));
    }

    #[test]
    fn test_notice_serializes_duration_as_millis() {
        let notice = StockNotice::for_book(&book(2)).with_display_for(Duration::from_millis(1500));
        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(json["displayFor"], 1500);
        assert_eq!(json["ceiling"], 2);
    }
}
