//! Lanyard CLI — terminal client for the Lanyard site.
//!
//! Drives the same form controller as the browser: the full client-side
//! ruleset runs locally, so an invalid submission never leaves the
//! machine, and the network call carries the same 15-second deadline.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};

use lanyard_core::form::{
    ContactTransport, FormController, FormFields, ServerAck, SubmitOutcome, TransportReply,
    MSG_SENDING, SUBMIT_TIMEOUT,
};
use lanyard_core::submission::ContactSubmission;
use lanyard_core::validate::validate;
use lanyard_core::TransportError;

/// Lanyard CLI — check the site and send contact messages from the terminal.
#[derive(Parser)]
#[command(
    name = "lanyard",
    version,
    about = "Lanyard CLI — check the site and send contact messages from the terminal"
)]
struct Cli {
    /// Lanyard server address.
    #[arg(long, env = "LANYARD_ADDR", default_value = "http://127.0.0.1:3000")]
    addr: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the server is up.
    Status,
    /// Send a contact message.
    Send {
        /// Your name (2+ characters).
        #[arg(long)]
        name: String,
        /// Your email address.
        #[arg(long)]
        email: String,
        /// Phone number (optional, any format).
        #[arg(long, default_value = "")]
        phone: String,
        /// What you need (10+ characters).
        #[arg(long)]
        reason: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let addr = cli.addr.trim_end_matches('/').to_owned();

    let result = match cli.command {
        Commands::Status => cmd_status(&addr).await,
        Commands::Send {
            name,
            email,
            phone,
            reason,
        } => cmd_send(&addr, name, email, phone, reason).await,
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

// ── Status ───────────────────────────────────────────────────────────

async fn cmd_status(addr: &str) -> Result<ExitCode> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .context("failed to build HTTP client")?;

    match http.get(format!("{addr}/healthz")).send().await {
        Ok(resp) if resp.status().is_success() => {
            println!("{addr} is up");
            Ok(ExitCode::SUCCESS)
        }
        Ok(resp) => {
            println!("{addr} answered with status {}", resp.status());
            Ok(ExitCode::FAILURE)
        }
        Err(err) => {
            println!("{addr} is unreachable: {err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

// ── Send ─────────────────────────────────────────────────────────────

async fn cmd_send(
    addr: &str,
    name: String,
    email: String,
    phone: String,
    reason: String,
) -> Result<ExitCode> {
    let fields = FormFields {
        name,
        email,
        phone,
        reason,
        trap: String::new(),
    };

    // The transient status only shows once the local checks pass — an
    // invalid submission is rejected without a network round trip.
    let preview = ContactSubmission::from_fields(
        &fields.name,
        &fields.email,
        &fields.phone,
        &fields.reason,
        "",
    );
    if validate(&preview).is_ok() {
        println!("{MSG_SENDING}");
    }

    let transport = HttpTransport::new(addr.to_owned())?;
    let mut controller = FormController::new();
    let outcome = controller.submit(&fields, &transport, Instant::now()).await;

    match &outcome {
        SubmitOutcome::Accepted { id } => {
            println!("{}", outcome.status_message());
            if let Some(id) = id {
                println!("Reference: {id}");
            }
            Ok(ExitCode::SUCCESS)
        }
        SubmitOutcome::Rejected(err) => {
            eprintln!("{} (field: {})", err.message, err.field.control_name());
            Ok(ExitCode::FAILURE)
        }
        _ => {
            eprintln!("{}", outcome.status_message());
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Reqwest-backed transport with the controller's 15-second deadline.
struct HttpTransport {
    http: reqwest::Client,
    addr: String,
}

impl HttpTransport {
    fn new(addr: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(SUBMIT_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http, addr })
    }
}

#[async_trait]
impl ContactTransport for HttpTransport {
    async fn submit(
        &self,
        submission: &ContactSubmission,
    ) -> Result<TransportReply, TransportError> {
        let response = self
            .http
            .post(format!("{}/api/contact", self.addr))
            .json(submission)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    TransportError::Timeout
                } else {
                    TransportError::Network(err.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let body = match response.json::<ServerAck>().await {
            Ok(ack) => Some(ack),
            Err(err) if err.is_timeout() => return Err(TransportError::Timeout),
            Err(_) => None,
        };

        Ok(TransportReply { status, body })
    }
}
