//! The contact submission — the one transient entity in the system.
//!
//! A submission exists for the duration of a single request: composed in
//! the browser (or CLI), relayed as email by the server, never stored.

use serde::{Deserialize, Serialize};

/// Maximum number of characters of `reason` sent over the wire.
pub const REASON_MAX_CHARS: usize = 4000;

/// A contact form submission as it travels over `POST /api/contact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    /// Submitter's name.
    pub name: String,
    /// Submitter's email, used as the reply-to address.
    pub email: String,
    /// Optional phone number, no format enforced.
    #[serde(default)]
    pub phone: String,
    /// Free-form message body.
    pub reason: String,
    /// Honeypot field. Hidden in the UI; any non-empty value marks the
    /// submission as automated.
    #[serde(default)]
    pub trap: String,
}

impl ContactSubmission {
    /// Build a submission from raw form field values, trimming surrounding
    /// whitespace on every field.
    #[must_use]
    pub fn from_fields(name: &str, email: &str, phone: &str, reason: &str, trap: &str) -> Self {
        Self {
            name: name.trim().to_owned(),
            email: email.trim().to_owned(),
            phone: phone.trim().to_owned(),
            reason: reason.trim().to_owned(),
            trap: trap.trim().to_owned(),
        }
    }

    /// Cap `reason` at [`REASON_MAX_CHARS`] characters.
    ///
    /// Counts characters, not bytes, so multi-byte input is never split
    /// mid code point.
    pub fn truncate_reason(&mut self) {
        if let Some((idx, _)) = self.reason.char_indices().nth(REASON_MAX_CHARS) {
            self.reason.truncate(idx);
        }
    }

    /// Whether the honeypot field was populated.
    #[must_use]
    pub fn is_honeypot(&self) -> bool {
        !self.trap.is_empty()
    }
}
