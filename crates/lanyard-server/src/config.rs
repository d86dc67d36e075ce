//! Server configuration for Lanyard.
//!
//! Everything is resolved from environment variables once at startup and
//! validated before the listener binds — a bad SMTP setup fails the
//! process immediately instead of failing the first submission. The
//! fallback chains are fixed and documented on [`ServerConfig::from_env`].

use std::net::SocketAddr;

use anyhow::{bail, Context};

/// Default sender when no from-address variable is set.
const FALLBACK_FROM: &str = "no-reply@localhost";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Environment mode; affects caching headers only.
    pub env: EnvMode,
    /// Log level filter (e.g. `info`, `debug`).
    pub log_level: String,
    /// Outbound SMTP relay settings.
    pub smtp: SmtpConfig,
    /// Sender and recipient for contact notifications.
    pub mail: MailRoute,
}

/// Environment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvMode {
    Development,
    Production,
}

impl EnvMode {
    #[must_use]
    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

impl std::fmt::Display for EnvMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => f.write_str("development"),
            Self::Production => f.write_str("production"),
        }
    }
}

/// SMTP relay connection settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// Relay hostname (e.g. `smtp.sendgrid.net`).
    pub host: String,
    /// Relay port; 587 unless configured otherwise.
    pub port: u16,
    /// `true` selects implicit TLS; `false` selects STARTTLS submission.
    pub secure: bool,
    /// Credential pair; both must be set for authentication to happen.
    pub user: Option<String>,
    pub pass: Option<String>,
}

/// Where contact notifications go.
#[derive(Debug, Clone)]
pub struct MailRoute {
    /// Sender address on outbound mail.
    pub from: String,
    /// Recipient address for contact notifications.
    pub to: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `LANYARD_BIND_ADDR` — full bind address (overrides `PORT`, default: `127.0.0.1:3000`)
    /// - `PORT` — port to bind on (binds to `0.0.0.0`, hosting convention)
    /// - `LANYARD_ENV` — `production` enables static-asset caching; anything else is development
    /// - `LANYARD_LOG_LEVEL` — log filter (default: `info`)
    /// - `SMTP_HOST` — relay hostname (required)
    /// - `SMTP_PORT` — relay port (default: `587`)
    /// - `SMTP_SECURE` — `true`/`1` for implicit TLS (default: STARTTLS)
    /// - `SMTP_USER` / `SMTP_PASS` — relay credentials (optional)
    /// - sender: `MAIL_FROM`, else `CONTACT_FROM`, else `SMTP_USER`, else `no-reply@localhost`
    /// - recipient: `CONTACT_TO`, else `SMTP_USER` (one of the two is required)
    ///
    /// # Errors
    ///
    /// Fails when a value does not parse, when `SMTP_HOST` is missing, or
    /// when no recipient can be resolved.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ServerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Priority: LANYARD_BIND_ADDR > PORT > default 127.0.0.1:3000
        let bind_addr = if let Some(addr) = lookup("LANYARD_BIND_ADDR") {
            addr.parse()
                .with_context(|| format!("LANYARD_BIND_ADDR is not a socket address: {addr}"))?
        } else if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .parse()
                .with_context(|| format!("PORT is not a port number: {port}"))?;
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            SocketAddr::from(([127, 0, 0, 1], 3000))
        };

        let env = match lookup("LANYARD_ENV") {
            Some(v) if v.eq_ignore_ascii_case("production") => EnvMode::Production,
            _ => EnvMode::Development,
        };

        let log_level = lookup("LANYARD_LOG_LEVEL").unwrap_or_else(|| "info".to_owned());

        let Some(host) = lookup("SMTP_HOST").filter(|h| !h.is_empty()) else {
            bail!("SMTP_HOST must be set to the outbound relay hostname");
        };

        let port = match lookup("SMTP_PORT") {
            Some(p) => p
                .parse()
                .with_context(|| format!("SMTP_PORT is not a port number: {p}"))?,
            None => 587,
        };

        let secure = lookup("SMTP_SECURE")
            .is_some_and(|v| v.eq_ignore_ascii_case("true") || v == "1");

        let user = lookup("SMTP_USER").filter(|v| !v.is_empty());
        let pass = lookup("SMTP_PASS").filter(|v| !v.is_empty());

        // Sender: MAIL_FROM > CONTACT_FROM > SMTP_USER > fixed fallback.
        let from = lookup("MAIL_FROM")
            .or_else(|| lookup("CONTACT_FROM"))
            .or_else(|| user.clone())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| FALLBACK_FROM.to_owned());

        // Recipient: CONTACT_TO > SMTP_USER; there is no safe default.
        let Some(to) = lookup("CONTACT_TO").or_else(|| user.clone()).filter(|v| !v.is_empty())
        else {
            bail!("CONTACT_TO (or SMTP_USER) must be set to receive contact mail");
        };

        Ok(Self {
            bind_addr,
            env,
            log_level,
            smtp: SmtpConfig {
                host,
                port,
                secure,
                user,
                pass,
            },
            mail: MailRoute { from, to },
        })
    }
}
