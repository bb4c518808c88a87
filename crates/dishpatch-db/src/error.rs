//! # Storage Error Types
//!
//! The error taxonomy for all storage-facing operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite error (sqlx::Error)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← classified: constraint kind, transaction,      │
//! │       │                  pool state                                     │
//! │       ▼                                                                 │
//! │  Caller (excluded HTTP layer) maps each variant to a message category   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every multi-step operation runs inside one transaction; any error here
//! means that transaction was (or will be, on drop) rolled back. A raw sqlx
//! error never crosses the crate boundary.

use dishpatch_core::ValidationError;
use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Malformed or out-of-range input, rejected before any SQL ran.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced entity does not exist (workflow precondition).
    ///
    /// ## When This Occurs
    /// - PlaceOrder names a customer/restaurant/menu item that is missing
    /// - AssignDelivery names a missing order or driver
    #[error("{entity} not found: {id}")]
    Reference { entity: String, id: i64 },

    /// The root entity of an operation does not exist.
    ///
    /// ## When This Occurs
    /// - Deleting an already-deleted order/customer/delivery
    /// - Lookups by id that must succeed
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: i64 },

    /// A business rule conflict.
    ///
    /// ## When This Occurs
    /// - Assigning a second active delivery to an order
    /// - A menu item that does not belong to the order's restaurant
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// A delete was blocked by a foreign-key relationship, translated into
    /// the blocking relationship's name (e.g. "has deliveries assigned").
    #[error("{entity} {id} cannot be deleted: {blocked_by}")]
    ReferentialIntegrity {
        entity: String,
        id: i64,
        blocked_by: String,
    },

    /// Raw foreign-key constraint signal from the storage engine.
    ///
    /// Internal: the delete engine catches this and translates it into
    /// [`DbError::ReferentialIntegrity`] with a named relationship.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Storage or connectivity failure inside a multi-step operation.
    /// The transaction has been rolled back in full.
    #[error("Transaction failed: {0}")]
    Transaction(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A required table is missing from the schema.
    ///
    /// Raised once at startup by the capability check, never per request.
    #[error("Schema is missing required table: {table}")]
    SchemaMissing { table: String },

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: i64) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id,
        }
    }

    /// Creates a Reference error for a missing foreign-key target.
    pub fn reference(entity: impl Into<String>, id: i64) -> Self {
        DbError::Reference {
            entity: entity.into(),
            id,
        }
    }

    /// Creates a Conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        DbError::Conflict {
            message: message.into(),
        }
    }

    /// Creates a ReferentialIntegrity error naming the blocking relationship.
    pub fn blocked(entity: impl Into<String>, id: i64, blocked_by: impl Into<String>) -> Self {
        DbError::ReferentialIntegrity {
            entity: entity.into(),
            id,
            blocked_by: blocked_by.into(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound (id unknown at this point)
/// sqlx::Error::Database (FK)  → DbError::ForeignKeyViolation
/// sqlx::Error::Database       → DbError::QueryFailed
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Transaction
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: 0,
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message().to_string();

                // SQLite reports constraint failures in the message text:
                // "FOREIGN KEY constraint failed", "CHECK constraint failed: ..."
                if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation { message: msg }
                } else {
                    DbError::QueryFailed(msg)
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Transaction(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for storage operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_message_names_relationship() {
        let err = DbError::blocked("Driver", 7, "has deliveries assigned");
        assert_eq!(
            err.to_string(),
            "Driver 7 cannot be deleted: has deliveries assigned"
        );
    }

    #[test]
    fn test_validation_wraps_core_error() {
        let core = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let err: DbError = core.into();
        assert!(matches!(err, DbError::Validation(_)));
    }
}
