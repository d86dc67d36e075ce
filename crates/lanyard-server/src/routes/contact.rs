//! The contact submission endpoint: `POST /api/contact`.
//!
//! Re-validates presence of the required fields (the browser already ran
//! the full ruleset), silently accepts honeypot-triggered submissions
//! without dispatching mail, and relays everything else through the
//! configured mailer.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use lanyard_core::mail::ContactEmail;
use lanyard_core::submission::ContactSubmission;

use crate::error::AppError;
use crate::state::AppState;

/// Message for a submission missing required fields.
const MISSING_FIELDS: &str =
    "Missing required fields: name, email, and reason are required.";

/// Generic client-facing message for relay failures.
const DISPATCH_FAILED: &str = "Could not send email.";

/// Build the contact router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/contact", post(submit))
}

/// Request body for `POST /api/contact`.
///
/// Every field is optional at the wire level; presence is checked by the
/// handler so a missing field and an empty field answer the same way.
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub trap: Option<String>,
}

/// Success acknowledgment for `POST /api/contact`.
#[derive(Debug, Serialize)]
pub struct ContactAck {
    pub ok: bool,
    /// Opaque identifier from the relay; absent for honeypot responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Handle a contact submission.
///
/// Honeypot-triggered submissions are acknowledged as successful and
/// discarded — the caller must not learn it was detected. Accepted
/// submissions produce exactly one relay dispatch; relay failures are
/// logged in full and answered with a generic message.
async fn submit(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ContactRequest>,
) -> Result<Json<ContactAck>, AppError> {
    if body.trap.as_deref().is_some_and(|t| !t.is_empty()) {
        tracing::debug!("honeypot submission discarded");
        return Ok(Json(ContactAck { ok: true, id: None }));
    }

    let (Some(name), Some(email), Some(reason)) = (
        present(body.name),
        present(body.email),
        present(body.reason),
    ) else {
        return Err(AppError::BadRequest(MISSING_FIELDS.to_owned()));
    };

    let submission = ContactSubmission {
        name,
        email,
        phone: body.phone.unwrap_or_default(),
        reason,
        trap: String::new(),
    };

    let email = ContactEmail::compose(&submission, &state.mail.from, &state.mail.to);

    match state.mailer.dispatch(&email).await {
        Ok(id) => Ok(Json(ContactAck {
            ok: true,
            id: Some(id),
        })),
        Err(err) => {
            tracing::error!(error = %err, "contact email dispatch failed");
            Err(AppError::Internal(DISPATCH_FAILED.to_owned()))
        }
    }
}

/// A field counts as present only when set and non-empty.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
