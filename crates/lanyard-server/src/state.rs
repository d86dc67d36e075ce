//! Shared application state for the Lanyard server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`. Requests are otherwise fully independent —
//! nothing here is mutated after startup.

use std::sync::Arc;

use crate::config::{EnvMode, MailRoute};
use crate::mailer::Mailer;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Outbound mail dispatch.
    pub mailer: Arc<dyn Mailer>,
    /// Sender and recipient for contact notifications.
    pub mail: MailRoute,
    /// Environment mode; drives static-asset cache headers.
    pub env: EnvMode,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
