//! Lanyard server entry point.
//!
//! Loads and validates configuration, builds the SMTP mailer, and starts
//! the Axum HTTP server with graceful shutdown. There are no background
//! workers — every request is handled independently and the process is
//! idle between requests.

use std::sync::Arc;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use lanyard_server::config::{EnvMode, ServerConfig};
use lanyard_server::mailer::SmtpMailer;
use lanyard_server::routes;
use lanyard_server::state::AppState;

/// Request body cap for the JSON endpoint (1 MiB).
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment; a bad SMTP or bind setup must
    // fail here, not on the first submission.
    let config = ServerConfig::from_env().context("invalid configuration")?;

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!(env = %config.env, relay = %config.smtp.host, "Lanyard starting");

    let mailer =
        Arc::new(SmtpMailer::new(&config.smtp).context("failed to build SMTP transport")?);

    let state = Arc::new(AppState {
        mailer,
        mail: config.mail.clone(),
        env: config.env,
    });

    let app = build_router(state, config.env);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "Lanyard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Lanyard stopped");
    Ok(())
}

/// Build the Axum router with all routes and middleware.
fn build_router(state: Arc<AppState>, env: EnvMode) -> Router {
    let mut app = Router::new()
        .merge(routes::contact::router())
        .merge(routes::sys::router())
        .merge(routes::ui::router())
        .fallback(routes::ui::spa_fallback)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http());

    // In development nothing may be cached, so stylesheet and markup
    // edits show up on plain reload.
    if env == EnvMode::Development {
        app = app
            .layer(SetResponseHeaderLayer::overriding(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-store, no-cache, must-revalidate, proxy-revalidate"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::PRAGMA,
                HeaderValue::from_static("no-cache"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::EXPIRES,
                HeaderValue::from_static("0"),
            ));
    }

    app.with_state(state)
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
