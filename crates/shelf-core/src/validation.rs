//! # Validation Module
//!
//! Input validation for the storefront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation                                                  │
//! │  └── Disables "Sign-In" while the name is out of range                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Storefront command                                            │
//! │  └── THIS MODULE: user names, catalog records                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                        │
//! │  ├── CHECK (quantity > 0)                                               │
//! │  └── UNIQUE (book_id, owner)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Search text is not validated at all: any string is a query, and whitespace
//! in it is matched literally.

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::Book;
use crate::{MAX_BOOK_PRICE, MAX_USER_NAME_LEN, MIN_USER_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a sign-in user name.
///
/// ## Rules
/// - Between 4 and 16 characters, inclusive
/// - Not trimmed: what the user typed is what gets stored
///
/// ```rust
/// use shelf_core::validation::validate_user_name;
///
/// assert!(validate_user_name("alice").is_ok());
/// assert!(validate_user_name("bob").is_err());
/// assert!(validate_user_name("a_very_long_username").is_err());
/// ```
pub fn validate_user_name(name: &str) -> ValidationResult<()> {
    let len = name.chars().count();

    if len == 0 {
        return Err(ValidationError::Required {
            field: "userName".to_string(),
        });
    }

    if len < MIN_USER_NAME_LEN {
        return Err(ValidationError::TooShort {
            field: "userName".to_string(),
            min: MIN_USER_NAME_LEN,
        });
    }

    if len > MAX_USER_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "userName".to_string(),
            max: MAX_USER_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a single catalog book.
///
/// ## Rules
/// - Title and author must not be blank
/// - Price between zero and [`MAX_BOOK_PRICE`], inclusive
pub fn validate_book(book: &Book) -> ValidationResult<()> {
    if book.title.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    if book.author.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "author".to_string(),
        });
    }

    if book.price.is_negative() || book.price > MAX_BOOK_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_BOOK_PRICE.cents(),
        });
    }

    Ok(())
}

/// Validates a whole catalog: every book, plus unique ids.
pub fn validate_catalog(books: &[Book]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(books.len());
    for book in books {
        validate_book(book)?;
        if !seen.insert(book.id) {
            return Err(ValidationError::Duplicate {
                field: "id".to_string(),
                value: book.id.to_string(),
            });
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
