use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::domains::auth::TokenError;

/// Authentication and authorization errors for the Town Market platform
///
/// Credential and permission failures are terminal for the current
/// request; nothing here retries.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Invalid credentials")]
    InvalidCredential,

    #[error("Credential expired")]
    ExpiredCredential,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not found")]
    NotFound,

    #[error("Email already registered")]
    Conflict,

    #[error("No phone number on record")]
    NoPhoneNumber,

    #[error("Malformed input: {0}")]
    Malformed(String),

    #[error("Could not deliver recovery code")]
    DeliveryFailure,

    #[error("Storage error: {0}")]
    StorageFailure(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::AuthenticationRequired
            | AuthError::InvalidCredential
            | AuthError::ExpiredCredential => StatusCode::UNAUTHORIZED,
            AuthError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::Conflict => StatusCode::CONFLICT,
            AuthError::NoPhoneNumber | AuthError::Malformed(_) => StatusCode::BAD_REQUEST,
            AuthError::DeliveryFailure
            | AuthError::StorageFailure(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable discriminant for response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::AuthenticationRequired => "authentication_required",
            AuthError::InvalidCredential => "invalid_credential",
            AuthError::ExpiredCredential => "expired_credential",
            AuthError::PermissionDenied(_) => "permission_denied",
            AuthError::NotFound => "not_found",
            AuthError::Conflict => "conflict",
            AuthError::NoPhoneNumber => "no_phone_number",
            AuthError::Malformed(_) => "malformed",
            AuthError::DeliveryFailure => "delivery_failure",
            AuthError::StorageFailure(_) => "storage_failure",
            AuthError::Internal(_) => "internal",
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Expired => AuthError::ExpiredCredential,
            TokenError::Invalid => AuthError::InvalidCredential,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));
        (self.status(), body).into_response()
    }
}
