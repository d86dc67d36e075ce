//! HTTP route handlers for the Lanyard server.
//!
//! Routes are organized by concern:
//! - `contact`: the submission endpoint at `/api/contact`
//! - `sys`: health probe
//! - `ui`: embedded front-end bundle and the index fallback

pub mod contact;
pub mod sys;
pub mod ui;
