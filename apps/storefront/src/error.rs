//! # API Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Command Function ──► Result<T, ApiError>                               │
//! │         │                                                               │
//! │         ├── DbError::QueryFailed("...") ─────────┐                      │
//! │         │                                        │                      │
//! │         ├── CoreError::NotSignedIn ──────────────┼──► ApiError          │
//! │         │                                        │    { code, message } │
//! │         └── ValidationError::TooShort ───────────┘                      │
//! │                                                                         │
//! │  Out-of-stock adds are NOT errors: add_to_cart returns an outcome.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Serialized form (for `--json` output):
//! ```json
//! { "code": "NOT_SIGNED_IN", "message": "Please sign in first" }
//! ```

use serde::Serialize;
use shelf_core::{CoreError, ValidationError};
use shelf_db::DbError;

use crate::state::ConfigError;

/// API error returned from commands.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Book or cart line not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Command needs a signed-in user
    NotSignedIn,

    /// Requested quantity is above the stock ceiling
    InsufficientStock,

    /// Cart operation failed
    CartError,

    /// Database operation failed
    DatabaseError,

    /// Configuration could not be loaded
    ConfigError,

    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::cart("Book is no longer in the catalog")
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::CorruptRow { table, reason } => {
                tracing::error!(%table, %reason, "Corrupt row");
                ApiError::new(ErrorCode::DatabaseError, "Stored data is corrupt")
            }
            DbError::CatalogImport(reason) => ApiError::new(
                ErrorCode::DatabaseError,
                format!("Catalog import failed: {}", reason),
            ),
            DbError::InvalidCatalog(e) => ApiError::validation(format!("Invalid catalog: {}", e)),
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::BookNotFound(id) => ApiError::not_found("Book", id),
            CoreError::InvalidBracket(value) => {
                ApiError::validation(format!("Unknown price bracket: {}", value))
            }
            CoreError::InsufficientStock { available, .. } => ApiError::new(
                ErrorCode::InsufficientStock,
                format!("Sorry, we have only {} available", available),
            ),
            CoreError::NotSignedIn => ApiError::new(ErrorCode::NotSignedIn, "Please sign in first"),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
