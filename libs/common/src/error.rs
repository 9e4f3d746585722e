//! Custom error types for the common library
//!
//! This module defines the persistence error taxonomy shared by every store
//! implementation, whether it is backed by PostgreSQL or kept in memory.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A write referenced a parent row that does not exist
    #[error("Foreign key violated: {0}")]
    ForeignKeyViolation(String),

    /// The record addressed by an update or delete does not exist
    #[error("Record not found")]
    NotFound,

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// Whether the error is a unique constraint violation
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DatabaseError::UniqueViolation(_))
    }

    /// Whether the error is a missing referenced row
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self, DatabaseError::ForeignKeyViolation(_))
    }
}

impl From<SqlxError> for DatabaseError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::RowNotFound => DatabaseError::NotFound,
            SqlxError::Database(db) if db.is_unique_violation() => {
                let constraint = db
                    .constraint()
                    .map(str::to_string)
                    .unwrap_or_else(|| db.message().to_string());
                DatabaseError::UniqueViolation(constraint)
            }
            SqlxError::Database(db) if db.is_foreign_key_violation() => {
                let constraint = db
                    .constraint()
                    .map(str::to_string)
                    .unwrap_or_else(|| db.message().to_string());
                DatabaseError::ForeignKeyViolation(constraint)
            }
            other => DatabaseError::Query(other),
        }
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err: DatabaseError = SqlxError::RowNotFound.into();
        assert!(matches!(err, DatabaseError::NotFound));
        assert!(!err.is_unique_violation());
    }

    #[test]
    fn other_sqlx_errors_map_to_query() {
        let err: DatabaseError = SqlxError::PoolTimedOut.into();
        assert!(matches!(err, DatabaseError::Query(_)));
    }

    #[test]
    fn unique_violation_is_detected() {
        let err = DatabaseError::UniqueViolation("users_email_key".to_string());
        assert!(err.is_unique_violation());
        assert_eq!(
            err.to_string(),
            "Unique constraint violated: users_email_key"
        );
    }

    #[test]
    fn foreign_key_violation_is_detected() {
        let err = DatabaseError::ForeignKeyViolation("visits_apartment_id_fkey".to_string());
        assert!(err.is_foreign_key_violation());
        assert!(!err.is_unique_violation());
    }
}
