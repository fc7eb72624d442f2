//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                   │
//! │                                                                        │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                │
//! │       ▼                                                                │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                │
//! │       ▼                                                                │
//! │  CheckoutError::Persistence ← Detail logged here, generic message out  │
//! │       │                                                                │
//! │       ▼                                                                │
//! │  Caller sees "checkout could not be completed"                         │
//! │                                                                        │
//! └────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use tracing::error;

use lapak_core::CheckoutError;

/// Database operation errors.
///
/// These wrap sqlx errors and classify the constraint violations the
/// checkout flow reacts to (order-code collisions in particular).
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation (order code, customer phone, coupon code).
    #[error("duplicate {field}: already exists")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation.
    #[error("foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// A persisted row contains data the domain layer rejects
    /// (e.g., malformed eligible-products JSON).
    #[error("corrupt row in {table}: {reason}")]
    CorruptRow { table: String, reason: String },

    /// Internal database error.
    #[error("internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Whether this error is a unique violation on the given column
    /// (as `table.column`, matching SQLite's constraint message).
    pub fn is_unique_violation_on(&self, column: &str) -> bool {
        matches!(self, DbError::UniqueViolation { field } if field == column)
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // UNIQUE: "UNIQUE constraint failed: <table>.<column>"
                // FK:     "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Persistence failures abort the checkout. The storage detail is logged
/// here, once, at the boundary; the caller only ever sees the generic
/// `Persistence` variant.
impl From<DbError> for CheckoutError {
    fn from(err: DbError) -> Self {
        error!(error = %err, "checkout persistence failure");
        CheckoutError::Persistence
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_column_check() {
        let err = DbError::UniqueViolation {
            field: "orders.code".to_string(),
        };
        assert!(err.is_unique_violation_on("orders.code"));
        assert!(!err.is_unique_violation_on("customers.phone"));
    }

    #[test]
    fn test_db_error_becomes_generic_checkout_error() {
        let err: CheckoutError = DbError::QueryFailed("boom".to_string()).into();
        assert_eq!(err, CheckoutError::Persistence);
    }
}
