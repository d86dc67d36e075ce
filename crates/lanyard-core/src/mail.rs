//! Outbound mail composition.
//!
//! Turns an accepted [`ContactSubmission`] into the email the relay will
//! deliver: plain-text and HTML variants of the same fields, reply-to set
//! to the submitter so a reply in the recipient's mail client goes to the
//! right place. Composition is pure — the SMTP transport lives in
//! `lanyard-server`.

use crate::submission::ContactSubmission;

/// Display name attached to the configured sender address.
pub const SENDER_NAME: &str = "Lanyard Website";

/// Shown in place of an empty phone field.
const PHONE_PLACEHOLDER: &str = "\u{2014}";

/// A fully composed contact notification email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEmail {
    /// Configured sender address.
    pub from: String,
    /// Configured recipient address.
    pub to: String,
    /// The submitter's email.
    pub reply_to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

impl ContactEmail {
    /// Compose the notification email for an accepted submission.
    #[must_use]
    pub fn compose(submission: &ContactSubmission, from: &str, to: &str) -> Self {
        let phone = if submission.phone.is_empty() {
            PHONE_PLACEHOLDER
        } else {
            submission.phone.as_str()
        };

        let text_body = format!(
            "Name: {}\nEmail: {}\nPhone: {}\nReason:\n{}",
            submission.name, submission.email, phone, submission.reason,
        );

        let html_body = format!(
            "<h2>New Contact Submission</h2>\n\
             <p><b>Name:</b> {}</p>\n\
             <p><b>Email:</b> {}</p>\n\
             <p><b>Phone:</b> {}</p>\n\
             <p><b>Reason:</b><br>{}</p>",
            escape_html(&submission.name),
            escape_html(&submission.email),
            escape_html(phone),
            escape_html(&submission.reason).replace('\n', "<br>"),
        );

        Self {
            from: from.to_owned(),
            to: to.to_owned(),
            reply_to: submission.email.clone(),
            subject: format!("New contact \u{2014} {}", submission.name),
            text_body,
            html_body,
        }
    }
}

/// Replace HTML metacharacters with entities.
fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(phone: &str, reason: &str) -> ContactSubmission {
        ContactSubmission::from_fields("Al", "al@example.com", phone, reason, "")
    }

    #[test]
    fn subject_embeds_the_name() {
        let email = ContactEmail::compose(
            &submission("", "Please call me back soon"),
            "no-reply@lanyard.site",
            "hello@lanyard.site",
        );
        assert_eq!(email.subject, "New contact — Al");
    }

    #[test]
    fn reply_to_is_the_submitter() {
        let email = ContactEmail::compose(
            &submission("", "Please call me back soon"),
            "no-reply@lanyard.site",
            "hello@lanyard.site",
        );
        assert_eq!(email.reply_to, "al@example.com");
        assert_eq!(email.from, "no-reply@lanyard.site");
        assert_eq!(email.to, "hello@lanyard.site");
    }

    #[test]
    fn empty_phone_gets_a_placeholder() {
        let email = ContactEmail::compose(
            &submission("", "Please call me back soon"),
            "f@x.co",
            "t@x.co",
        );
        assert!(email.text_body.contains("Phone: —"));
        assert!(email.html_body.contains("<b>Phone:</b> —"));
    }

    #[test]
    fn provided_phone_is_kept() {
        let email = ContactEmail::compose(
            &submission("555-0100", "Please call me back soon"),
            "f@x.co",
            "t@x.co",
        );
        assert!(email.text_body.contains("Phone: 555-0100"));
    }

    #[test]
    fn reason_line_breaks_survive_in_both_bodies() {
        let email = ContactEmail::compose(&submission("", "line one\nline two"), "f@x.co", "t@x.co");
        assert!(email.text_body.ends_with("Reason:\nline one\nline two"));
        assert!(email.html_body.contains("line one<br>line two"));
    }

    #[test]
    fn html_body_escapes_markup_in_fields() {
        let s = ContactSubmission::from_fields(
            "Al",
            "al@example.com",
            "",
            "<script>alert(1)</script> & more",
            "",
        );
        let email = ContactEmail::compose(&s, "f@x.co", "t@x.co");
        assert!(!email.html_body.contains("<script>"));
        assert!(email.html_body.contains("&lt;script&gt;"));
        assert!(email.html_body.contains("&amp; more"));
        // The plain-text body is untouched.
        assert!(email.text_body.contains("<script>alert(1)</script> & more"));
    }
}
