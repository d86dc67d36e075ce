//! Lanyard HTTP server.
//!
//! Wires the core library into a running Axum server: the marketing site
//! at `/`, the contact endpoint at `/api/contact`, and a health probe at
//! `/healthz`. Accepted submissions are relayed as email over SMTP; the
//! server itself keeps no state between requests.

pub mod config;
pub mod error;
pub mod mailer;
pub mod routes;
pub mod state;
