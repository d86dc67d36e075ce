//! Core library for the Lanyard site.
//!
//! Contains the contact submission model, client-side field validation,
//! outbound mail composition, and the form submission controller. This
//! crate performs no I/O — the HTTP transport and the SMTP relay live
//! behind traits implemented by `lanyard-server` and `lanyard-cli`.

pub mod error;
pub mod form;
pub mod mail;
pub mod submission;
pub mod validate;

pub use error::TransportError;
pub use form::{ContactTransport, FormController, FormFields, ServerAck, SubmitOutcome, TransportReply};
pub use mail::ContactEmail;
pub use submission::ContactSubmission;
pub use validate::{Field, FieldError};
