//! SMTP relay dispatch.
//!
//! [`Mailer`] is the seam between the contact endpoint and the outside
//! world; [`SmtpMailer`] is the lettre-backed implementation. Tests swap
//! in a recording double, so no test ever opens a relay session.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use lanyard_core::mail::{ContactEmail, SENDER_NAME};

use crate::config::SmtpConfig;

/// Errors from composing or dispatching an outbound email.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// A mailbox (configured or submitted) failed to parse.
    #[error("invalid mailbox '{value}': {reason}")]
    Address { value: String, reason: String },

    /// Message assembly failed.
    #[error("failed to assemble message: {reason}")]
    Build { reason: String },

    /// The relay refused or the connection failed.
    #[error("SMTP dispatch failed: {reason}")]
    Transport { reason: String },
}

/// Outbound mail dispatch.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a composed email through the relay.
    ///
    /// Returns an opaque identifier from the relay on success.
    ///
    /// # Errors
    ///
    /// Returns [`MailError`] when the message cannot be assembled or the
    /// relay rejects the dispatch.
    async fn dispatch(&self, email: &ContactEmail) -> Result<String, MailError>;
}

/// Lettre-backed SMTP mailer. One relay session per dispatch.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build the transport from relay settings.
    ///
    /// `secure` selects implicit TLS; otherwise the connection upgrades
    /// via STARTTLS. Credentials are attached only when both user and
    /// password are configured.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Transport`] when the relay parameters are
    /// unusable (e.g. an invalid hostname).
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let builder = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|err| MailError::Transport {
            reason: err.to_string(),
        })?
        .port(config.port);

        let builder = match (&config.user, &config.pass) {
            (Some(user), Some(pass)) => {
                builder.credentials(Credentials::new(user.clone(), pass.clone()))
            }
            _ => builder,
        };

        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn dispatch(&self, email: &ContactEmail) -> Result<String, MailError> {
        let message = assemble(email)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|err| MailError::Transport {
                reason: err.to_string(),
            })?;

        // The relay's reply line (e.g. "Ok: queued as …") is the opaque
        // identifier handed back to the caller.
        let id = response.message().collect::<Vec<_>>().join(" ");
        Ok(if id.is_empty() {
            response.code().to_string()
        } else {
            id
        })
    }
}

/// Turn a composed [`ContactEmail`] into a lettre [`Message`].
fn assemble(email: &ContactEmail) -> Result<Message, MailError> {
    let from = Mailbox::new(Some(SENDER_NAME.to_owned()), parse_address(&email.from)?);
    let to = Mailbox::new(None, parse_address(&email.to)?);
    let reply_to = Mailbox::new(None, parse_address(&email.reply_to)?);

    Message::builder()
        .from(from)
        .to(to)
        .reply_to(reply_to)
        .subject(email.subject.clone())
        .multipart(MultiPart::alternative_plain_html(
            email.text_body.clone(),
            email.html_body.clone(),
        ))
        .map_err(|err| MailError::Build {
            reason: err.to_string(),
        })
}

fn parse_address(value: &str) -> Result<lettre::Address, MailError> {
    value.parse().map_err(|err: lettre::address::AddressError| {
        MailError::Address {
            value: value.to_owned(),
            reason: err.to_string(),
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lanyard_core::submission::ContactSubmission;

    use super::*;

    fn composed() -> ContactEmail {
        let submission = ContactSubmission::from_fields(
            "Al",
            "al@example.com",
            "",
            "Please call me back soon",
            "",
        );
        ContactEmail::compose(&submission, "no-reply@lanyard.site", "hello@lanyard.site")
    }

    #[test]
    fn assemble_builds_a_multipart_message() {
        let message = assemble(&composed()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: "));
        assert!(raw.contains("Reply-To: al@example.com"));
        assert!(raw.contains("multipart/alternative"));
    }

    #[test]
    fn assemble_rejects_an_unparseable_reply_to() {
        let mut email = composed();
        email.reply_to = "not an address".to_owned();
        let err = assemble(&email).unwrap_err();
        assert!(matches!(err, MailError::Address { .. }));
    }
}
