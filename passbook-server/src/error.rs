//! HTTP error mapping
//!
//! Core errors carry their own display text; this layer only picks the
//! status code and wraps the text in the `{"message": ...}` body shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use passbook_core::Error;

/// Wrapper turning core errors into HTTP responses
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::UserNotFound | Error::StatementNotFound => StatusCode::NOT_FOUND,
            Error::InsufficientFunds | Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::EmailAlreadyInUse => StatusCode::CONFLICT,
            Error::IncorrectCredentials | Error::Token(_) => StatusCode::UNAUTHORIZED,
            Error::Database(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Store and plumbing failures are logged server-side; the client
        // only learns that something went wrong.
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
            return message_response(status, "Internal server error");
        }

        message_response(status, &self.0.to_string())
    }
}

/// Build a `{"message": ...}` response with the given status
pub fn message_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}
