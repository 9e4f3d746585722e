//! Request-level error taxonomy shared by every handler

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use staykey_common::error::DatabaseError;
use thiserror::Error;
use tracing::error;

use crate::credentials::CredentialError;

/// Custom error type for authentication and authorization failures
#[derive(Error, Debug)]
pub enum AuthError {
    /// No session, or a session whose token failed verification
    #[error("Unauthorized")]
    Unauthorized,

    /// Valid session with an insufficient role
    #[error("Forbidden")]
    Forbidden,

    /// Login failed; never says whether the email or the password was wrong
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Caller-supplied data failed validation
    #[error("{0}")]
    Validation(String),

    /// Referenced record is absent
    #[error("{0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("{0}")]
    Conflict(String),

    /// Anything the caller cannot fix
    #[error("Internal server error")]
    Internal,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Unauthorized | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::NotFound(_) => StatusCode::NOT_FOUND,
            AuthError::Conflict(_) => StatusCode::CONFLICT,
            AuthError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DatabaseError> for AuthError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::UniqueViolation(_) => {
                AuthError::Conflict("An account with this email already exists".to_string())
            }
            DatabaseError::NotFound => AuthError::NotFound("Record not found".to_string()),
            DatabaseError::ForeignKeyViolation(_) => {
                AuthError::NotFound("Referenced record not found".to_string())
            }
            other => {
                error!("Persistence failure: {}", other);
                AuthError::Internal
            }
        }
    }
}

impl From<CredentialError> for AuthError {
    fn from(err: CredentialError) -> Self {
        error!("Credential failure: {}", err);
        AuthError::Internal
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string(),
        }));

        (self.status(), body).into_response()
    }
}

/// Type alias for handler results
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_to_http_statuses() {
        assert_eq!(AuthError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::Validation("bad".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::NotFound("gone".to_string()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AuthError::Conflict("taken".to_string()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(AuthError::Internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unique_violation_becomes_account_exists_conflict() {
        let err: AuthError = DatabaseError::UniqueViolation("users_email_key".to_string()).into();
        assert!(matches!(err, AuthError::Conflict(_)));
        assert_eq!(err.to_string(), "An account with this email already exists");
    }

    #[test]
    fn foreign_key_violation_is_a_missing_reference() {
        let err: AuthError =
            DatabaseError::ForeignKeyViolation("visits_apartment_id_fkey".to_string()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Referenced record not found");
    }

    #[test]
    fn other_database_errors_are_internal() {
        let err: AuthError = DatabaseError::Configuration("bad url".to_string()).into();
        assert!(matches!(err, AuthError::Internal));
        assert!(matches!(
            AuthError::from(DatabaseError::NotFound),
            AuthError::NotFound(_)
        ));
    }
}
