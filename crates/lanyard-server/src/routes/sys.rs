//! Health probe.

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Build the system router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/healthz", get(health))
}

/// Response body for `GET /healthz`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}
