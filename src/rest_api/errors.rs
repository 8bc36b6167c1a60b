//! # REST API Errors
//!
//! Error types for the REST API and their HTTP mapping:
//!
//! - validation failures: 400 with `{field: [messages]}`
//! - malformed JSON: 400 with `{"detail": ...}`
//! - unknown resource: 404 with an empty body
//! - auth failures: 401 with `{"detail": ...}`
//! - store failures: 500 with `{"detail": ...}`

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;
use crate::schema::{messages, ValidationErrors};
use crate::serializer::SerializerError;
use crate::store::StoreError;

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

/// REST API errors
#[derive(Debug, Clone, Error)]
pub enum RestError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Field-level validation failure
    #[error("Invalid input: {0}")]
    Validation(ValidationErrors),

    /// Request body is not valid JSON
    #[error("JSON parse error - {0}")]
    MalformedJson(String),

    /// Resource not found
    #[error("Not found.")]
    NotFound,

    // ==================
    // Auth Errors
    // ==================
    #[error("{0}")]
    Auth(#[from] AuthError),

    // ==================
    // Server Errors (5xx)
    // ==================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RestError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::Validation(_) => StatusCode::BAD_REQUEST,
            RestError::MalformedJson(_) => StatusCode::BAD_REQUEST,
            RestError::NotFound => StatusCode::NOT_FOUND,
            RestError::Auth(auth_err) => StatusCode::from_u16(auth_err.status_code())
                .unwrap_or(StatusCode::UNAUTHORIZED),
            RestError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for RestError {
    fn from(errors: ValidationErrors) -> Self {
        RestError::Validation(errors)
    }
}

impl From<StoreError> for RestError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => RestError::NotFound,
            StoreError::UniqueViolation { field, .. } => {
                RestError::Validation(ValidationErrors::single(field, messages::ALREADY_EXISTS))
            }
            StoreError::MissingReference { field, .. } => {
                RestError::Validation(ValidationErrors::single(field, messages::INVALID_CHOICE))
            }
            other => RestError::Internal(other.to_string()),
        }
    }
}

impl From<SerializerError> for RestError {
    fn from(err: SerializerError) -> Self {
        match err {
            SerializerError::Invalid(errors) => RestError::Validation(errors),
            SerializerError::Store(store_err) => store_err.into(),
        }
    }
}

/// Error response body for errors not tied to a field
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            RestError::Validation(errors) => (status, Json(errors)).into_response(),
            RestError::NotFound => status.into_response(),
            RestError::Auth(err) => {
                let mut response = (
                    status,
                    Json(ErrorResponse {
                        detail: err.to_string(),
                    }),
                )
                    .into_response();
                if status == StatusCode::UNAUTHORIZED {
                    response.headers_mut().insert(
                        header::WWW_AUTHENTICATE,
                        HeaderValue::from_static("Bearer realm=\"api\""),
                    );
                }
                response
            }
            RestError::MalformedJson(reason) => (
                status,
                Json(ErrorResponse {
                    detail: format!("JSON parse error - {}", reason),
                }),
            )
                .into_response(),
            RestError::Internal(message) => {
                (status, Json(ErrorResponse { detail: message })).into_response()
            }
        }
    }
}
