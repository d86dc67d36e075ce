//! Client-side field validation.
//!
//! Rules run in a fixed order — name, email, reason — and stop at the
//! first failure so the UI can mark and focus exactly one control. The
//! email check is a deliberately permissive shape test (`local@domain.tld`
//! with no whitespace), not an RFC grammar; the server independently
//! checks presence only.

use std::sync::LazyLock;

use regex::Regex;

use crate::submission::ContactSubmission;

/// Minimum characters for `name`.
pub const NAME_MIN_CHARS: usize = 2;
/// Minimum characters for `reason`.
pub const REASON_MIN_CHARS: usize = 10;

#[allow(clippy::unwrap_used)] // literal pattern
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// A form control that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Reason,
}

impl Field {
    /// The `name` attribute of the corresponding form control.
    #[must_use]
    pub fn control_name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Reason => "reason",
        }
    }
}

/// A failed validation: which field, and the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: Field) -> Self {
        let message = match field {
            Field::Name => "Please enter your name (2+ characters).",
            Field::Email => "Please enter a valid email address.",
            Field::Reason => "Please provide a brief message (10+ characters).",
        };
        Self { field, message }
    }
}

/// Whether a value matches the permissive `local@domain.tld` shape.
#[must_use]
pub fn email_shape(value: &str) -> bool {
    EMAIL_SHAPE.is_match(value)
}

/// Validate a trimmed submission, halting at the first failing field.
///
/// `phone` and `trap` are never validated.
///
/// # Errors
///
/// Returns the [`FieldError`] for the first field that fails.
pub fn validate(submission: &ContactSubmission) -> Result<(), FieldError> {
    if submission.name.chars().count() < NAME_MIN_CHARS {
        return Err(FieldError::new(Field::Name));
    }
    if !email_shape(&submission.email) {
        return Err(FieldError::new(Field::Email));
    }
    if submission.reason.chars().count() < REASON_MIN_CHARS {
        return Err(FieldError::new(Field::Reason));
    }
    Ok(())
}
