//! # REST API Interface Layer
//!
//! Provides the HTTP endpoints for the bank. This layer handles:
//! - Request/response serialization
//! - Translating domain errors to HTTP status codes
//! - Running the authorization gate before account-scoped operations
//! - Request logging
//!
//! ## Design Principles
//!
//! - **Domain Separation**: Pure translation layer without business logic
//! - **Error Transparency**: Every failure returns a JSON `{ "error": … }`
//!   body with a status the client can branch on
//! - **Gate First**: No account-scoped handler touches state before the
//!   authorization gate has bound the token to the addressed account

pub mod account_apis;
pub mod mappers;
pub mod transfer_apis;

use axum::http::header::HeaderMap;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use crate::backend::domain::AuthError;
use shared::ApiError;

/// Header carrying the opaque auth token.
pub const AUTH_HEADER: &str = "x-auth-token";

/// Pull the token out of the request headers. A missing or non-UTF-8
/// header decodes as an empty token, which the gate rejects.
pub fn auth_token(headers: &HeaderMap) -> &str {
    headers
        .get(AUTH_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

/// JSON error response with the given status.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiError::new(message))).into_response()
}

/// Authorization failures map to 401/403 so clients can distinguish a
/// missing or bad token from acting on someone else's account.
pub fn auth_error_response(err: AuthError) -> Response {
    let status = match err {
        AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
        AuthError::Forbidden => StatusCode::FORBIDDEN,
        AuthError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, err.to_string())
}
