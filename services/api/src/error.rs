//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use staykey_auth::AuthError;
use staykey_common::error::DatabaseError;
use thiserror::Error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Gate rejections and anything already classified by the auth core
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Bad request with message
    #[error("{0}")]
    BadRequest(String),

    /// Named resource is absent
    #[error("{0} not found")]
    NotFound(&'static str),
}

impl ApiError {
    /// Map a persistence error, naming the resource when a row is missing
    ///
    /// A foreign key violation names the referenced record instead.
    pub fn from_database(err: DatabaseError, resource: &'static str) -> Self {
        match err {
            DatabaseError::NotFound => ApiError::NotFound(resource),
            DatabaseError::ForeignKeyViolation(constraint) => match referenced(&constraint) {
                Some(referenced) => ApiError::NotFound(referenced),
                None => ApiError::Auth(AuthError::from(DatabaseError::ForeignKeyViolation(
                    constraint,
                ))),
            },
            other => ApiError::Auth(AuthError::from(other)),
        }
    }
}

/// The record a foreign key constraint points at
fn referenced(constraint: &str) -> Option<&'static str> {
    if constraint.contains("apartment_id") {
        Some("Apartment")
    } else if constraint.contains("user_id") {
        Some("User")
    } else {
        None
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        ApiError::Auth(AuthError::from(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Auth(inner) => inner.status(),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
