//! The form submission controller.
//!
//! Mirrors the browser flow: trim, validate in fixed order, truncate the
//! message, hand the payload to a transport, classify what came back. The
//! transport is a trait so the controller can be exercised without a
//! network; `lanyard-cli` plugs in a real HTTP client with a 15-second
//! deadline.
//!
//! After a successful submission the controller refuses further submits
//! for a short cooldown. The cooldown is state on the controller
//! instance, one per form, so independent forms never interfere.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::TransportError;
use crate::submission::ContactSubmission;
use crate::validate::{validate, FieldError};

/// Status line shown while the request is in flight.
pub const MSG_SENDING: &str = "Sending...";
/// Status line shown after an accepted submission.
pub const MSG_SUCCESS: &str = "Thanks! We'll get back to you shortly.";
/// Shown when the transport hit its deadline.
pub const MSG_TIMEOUT: &str = "Request timed out. Please try again.";
/// Shown for any other transport failure.
pub const MSG_NETWORK: &str = "Network error. Please try again.";
/// Shown when the response body could not be decoded.
pub const MSG_UNEXPECTED_BODY: &str = "Unexpected server response.";

/// How long a successful submission suppresses resubmits.
pub const RESUBMIT_COOLDOWN: Duration = Duration::from_secs(2);

/// Deadline a [`ContactTransport`] implementation must enforce.
pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(15);

/// Raw field values as read from the form controls, untrimmed.
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub reason: String,
    pub trap: String,
}

impl FormFields {
    fn to_submission(&self) -> ContactSubmission {
        ContactSubmission::from_fields(
            &self.name,
            &self.email,
            &self.phone,
            &self.reason,
            &self.trap,
        )
    }
}

/// Decoded server acknowledgment body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerAck {
    pub ok: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

/// What the transport saw: the HTTP status and the decoded body.
///
/// `body` is `None` when the response was not valid JSON — a decode
/// failure is a value here, never an error to propagate.
#[derive(Debug, Clone)]
pub struct TransportReply {
    pub status: u16,
    pub body: Option<ServerAck>,
}

/// The network seam between the controller and the contact endpoint.
///
/// Implementations own the 15-second deadline: when it expires they must
/// cancel the request and return [`TransportError::Timeout`].
#[async_trait]
pub trait ContactTransport: Send + Sync {
    /// Deliver the submission, returning whatever the server said.
    ///
    /// # Errors
    ///
    /// [`TransportError::Timeout`] when the deadline expired,
    /// [`TransportError::Network`] for any other transport failure.
    async fn submit(&self, submission: &ContactSubmission)
        -> Result<TransportReply, TransportError>;
}

/// Terminal result of one submission attempt. No outcome retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Cooldown from a recent success is still active; nothing was sent.
    Suppressed,
    /// A field failed validation; nothing was sent.
    Rejected(FieldError),
    /// HTTP success and `ok: true`; `id` is the relay's message id.
    Accepted { id: Option<String> },
    /// The server answered but did not accept the submission.
    Failed { message: String },
    /// The transport hit its deadline.
    TimedOut,
    /// The transport failed some other way.
    NetworkError,
}

impl SubmitOutcome {
    /// The status line to show for this outcome.
    #[must_use]
    pub fn status_message(&self) -> &str {
        match self {
            Self::Suppressed => "",
            Self::Rejected(err) => err.message,
            Self::Accepted { .. } => MSG_SUCCESS,
            Self::Failed { message } => message,
            Self::TimedOut => MSG_TIMEOUT,
            Self::NetworkError => MSG_NETWORK,
        }
    }

    /// Whether the outcome is an error state (drives styling and exit codes).
    #[must_use]
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Accepted { .. } | Self::Suppressed)
    }
}

/// Per-form submission state. One instance per form.
#[derive(Debug, Default)]
pub struct FormController {
    locked_until: Option<Instant>,
}

impl FormController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the post-success cooldown is still active at `now`.
    #[must_use]
    pub fn is_locked(&self, now: Instant) -> bool {
        self.locked_until.is_some_and(|until| now < until)
    }

    /// Run one submission attempt.
    ///
    /// Validation failures and an active cooldown return without touching
    /// the transport. Every outcome leaves the controller ready for the
    /// next attempt — the UI re-enables its submit control regardless.
    pub async fn submit<T>(
        &mut self,
        fields: &FormFields,
        transport: &T,
        now: Instant,
    ) -> SubmitOutcome
    where
        T: ContactTransport + ?Sized,
    {
        if self.is_locked(now) {
            return SubmitOutcome::Suppressed;
        }

        let mut submission = fields.to_submission();
        if let Err(err) = validate(&submission) {
            return SubmitOutcome::Rejected(err);
        }
        submission.truncate_reason();

        match transport.submit(&submission).await {
            Ok(reply) => self.classify(&reply, now),
            Err(TransportError::Timeout) => SubmitOutcome::TimedOut,
            Err(TransportError::Network(_)) => SubmitOutcome::NetworkError,
        }
    }

    fn classify(&mut self, reply: &TransportReply, now: Instant) -> SubmitOutcome {
        let http_ok = (200..300).contains(&reply.status);
        match &reply.body {
            Some(ack) if http_ok && ack.ok => {
                self.locked_until = Some(now + RESUBMIT_COOLDOWN);
                SubmitOutcome::Accepted {
                    id: ack.id.clone(),
                }
            }
            Some(ack) => SubmitOutcome::Failed {
                message: ack
                    .message
                    .clone()
                    .unwrap_or_else(|| fallback_message(reply.status)),
            },
            None => SubmitOutcome::Failed {
                message: MSG_UNEXPECTED_BODY.to_owned(),
            },
        }
    }
}

/// Generic failure line naming the HTTP status, used when the server
/// sent no message of its own.
fn fallback_message(status: u16) -> String {
    format!("Unable to send right now (status {status}).")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::validate::Field;

    /// Transport double: records submissions, replays a scripted result.
    struct ScriptedTransport {
        calls: AtomicUsize,
        last: Mutex<Option<ContactSubmission>>,
        result: Mutex<Option<Result<TransportReply, TransportError>>>,
    }

    impl ScriptedTransport {
        fn replying(status: u16, body: Option<ServerAck>) -> Self {
            Self::new(Ok(TransportReply { status, body }))
        }

        fn failing(err: TransportError) -> Self {
            Self::new(Err(err))
        }

        fn new(result: Result<TransportReply, TransportError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
                result: Mutex::new(Some(result)),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ContactTransport for ScriptedTransport {
        async fn submit(
            &self,
            submission: &ContactSubmission,
        ) -> Result<TransportReply, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(submission.clone());
            self.result
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(TransportError::Network("script exhausted".to_owned())))
        }
    }

    fn valid_fields() -> FormFields {
        FormFields {
            name: "Al".to_owned(),
            email: "al@example.com".to_owned(),
            phone: String::new(),
            reason: "Please call me back soon".to_owned(),
            trap: String::new(),
        }
    }

    fn accepted_ack() -> Option<ServerAck> {
        Some(ServerAck {
            ok: true,
            message: None,
            id: Some("relay-42".to_owned()),
        })
    }

    #[tokio::test]
    async fn short_name_rejects_before_any_network_call() {
        let transport = ScriptedTransport::replying(200, accepted_ack());
        let mut controller = FormController::new();
        let mut fields = valid_fields();
        fields.name = "A".to_owned();

        let outcome = controller
            .submit(&fields, &transport, Instant::now())
            .await;

        assert_eq!(
            outcome,
            SubmitOutcome::Rejected(FieldError {
                field: Field::Name,
                message: "Please enter your name (2+ characters).",
            })
        );
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn first_invalid_field_wins_when_everything_is_wrong() {
        let transport = ScriptedTransport::replying(200, accepted_ack());
        let mut controller = FormController::new();
        let fields = FormFields {
            name: String::new(),
            email: "bad".to_owned(),
            phone: String::new(),
            reason: "short".to_owned(),
            trap: String::new(),
        };

        let outcome = controller
            .submit(&fields, &transport, Instant::now())
            .await;

        let SubmitOutcome::Rejected(err) = outcome else {
            panic!("expected rejection, got {outcome:?}");
        };
        assert_eq!(err.field, Field::Name);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn bad_email_shape_rejects_before_any_network_call() {
        let transport = ScriptedTransport::replying(200, accepted_ack());
        let mut controller = FormController::new();
        let mut fields = valid_fields();
        fields.email = "al@example".to_owned();

        let outcome = controller
            .submit(&fields, &transport, Instant::now())
            .await;

        assert!(matches!(
            outcome,
            SubmitOutcome::Rejected(FieldError {
                field: Field::Email,
                ..
            })
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn long_reason_is_truncated_before_transmission() {
        let transport = ScriptedTransport::replying(200, accepted_ack());
        let mut controller = FormController::new();
        let mut fields = valid_fields();
        fields.reason = "y".repeat(5000);

        controller
            .submit(&fields, &transport, Instant::now())
            .await;

        let sent = transport.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.reason.chars().count(), 4000);
    }

    #[tokio::test]
    async fn accepted_reply_carries_the_relay_id() {
        let transport = ScriptedTransport::replying(200, accepted_ack());
        let mut controller = FormController::new();

        let outcome = controller
            .submit(&valid_fields(), &transport, Instant::now())
            .await;

        assert_eq!(
            outcome,
            SubmitOutcome::Accepted {
                id: Some("relay-42".to_owned())
            }
        );
        assert_eq!(outcome.status_message(), MSG_SUCCESS);
    }

    #[tokio::test]
    async fn success_locks_resubmits_for_the_cooldown() {
        let transport = ScriptedTransport::replying(200, accepted_ack());
        let mut controller = FormController::new();
        let now = Instant::now();

        controller.submit(&valid_fields(), &transport, now).await;
        assert_eq!(transport.calls(), 1);

        // One second later the cooldown is still active.
        let retry = controller
            .submit(&valid_fields(), &transport, now + Duration::from_secs(1))
            .await;
        assert_eq!(retry, SubmitOutcome::Suppressed);
        assert_eq!(transport.calls(), 1);

        // After the cooldown the controller submits again.
        assert!(!controller.is_locked(now + Duration::from_secs(3)));
    }

    #[tokio::test]
    async fn failure_does_not_lock() {
        let transport = ScriptedTransport::replying(
            500,
            Some(ServerAck {
                ok: false,
                message: Some("Could not send email.".to_owned()),
                id: None,
            }),
        );
        let mut controller = FormController::new();
        let now = Instant::now();

        let outcome = controller.submit(&valid_fields(), &transport, now).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Failed {
                message: "Could not send email.".to_owned()
            }
        );
        assert!(!controller.is_locked(now + Duration::from_millis(1)));
    }

    #[tokio::test]
    async fn http_error_without_message_names_the_status() {
        let transport = ScriptedTransport::replying(
            502,
            Some(ServerAck {
                ok: false,
                message: None,
                id: None,
            }),
        );
        let mut controller = FormController::new();

        let outcome = controller
            .submit(&valid_fields(), &transport, Instant::now())
            .await;

        assert_eq!(
            outcome,
            SubmitOutcome::Failed {
                message: "Unable to send right now (status 502).".to_owned()
            }
        );
    }

    #[tokio::test]
    async fn ok_body_on_error_status_is_still_a_failure() {
        // `ok: true` in the body does not override a non-success status.
        let transport = ScriptedTransport::replying(503, accepted_ack());
        let mut controller = FormController::new();

        let outcome = controller
            .submit(&valid_fields(), &transport, Instant::now())
            .await;

        assert_eq!(
            outcome,
            SubmitOutcome::Failed {
                message: "Unable to send right now (status 503).".to_owned()
            }
        );
    }

    #[tokio::test]
    async fn undecodable_body_synthesizes_a_failure() {
        let transport = ScriptedTransport::replying(200, None);
        let mut controller = FormController::new();

        let outcome = controller
            .submit(&valid_fields(), &transport, Instant::now())
            .await;

        assert_eq!(
            outcome,
            SubmitOutcome::Failed {
                message: MSG_UNEXPECTED_BODY.to_owned()
            }
        );
    }

    #[tokio::test]
    async fn timeout_and_network_failure_are_distinct_outcomes() {
        let mut controller = FormController::new();

        let timed_out = ScriptedTransport::failing(TransportError::Timeout);
        let outcome = controller
            .submit(&valid_fields(), &timed_out, Instant::now())
            .await;
        assert_eq!(outcome, SubmitOutcome::TimedOut);
        assert_eq!(outcome.status_message(), MSG_TIMEOUT);

        let refused =
            ScriptedTransport::failing(TransportError::Network("connection refused".to_owned()));
        let outcome = controller
            .submit(&valid_fields(), &refused, Instant::now())
            .await;
        assert_eq!(outcome, SubmitOutcome::NetworkError);
        assert_eq!(outcome.status_message(), MSG_NETWORK);
        assert_ne!(MSG_TIMEOUT, MSG_NETWORK);
    }
}
