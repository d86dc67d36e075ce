//! HTTP error types for the Lanyard server.
//!
//! Every error variant produces the wire shape `{ "ok": false,
//! "message": … }`. Relay failures are logged with full detail at the
//! call site and reach this type only as the generic client-facing
//! message — internal detail never crosses the HTTP boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Application-level error returned from HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Client sent an invalid submission.
    BadRequest(String),
    /// Something on our side failed; the message is already sanitized.
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    ok: bool,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = ErrorBody { ok: false, message };

        (status, axum::Json(body)).into_response()
    }
}
