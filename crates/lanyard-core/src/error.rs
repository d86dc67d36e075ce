//! Error types for `lanyard-core`.

/// Errors surfaced by a [`crate::form::ContactTransport`] implementation.
///
/// The controller treats the two variants differently: a timeout gets its
/// own user-facing message, everything else collapses into the generic
/// network failure.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request exceeded the transport's deadline and was cancelled.
    #[error("request timed out")]
    Timeout,

    /// The request failed before a response was received.
    #[error("network error: {0}")]
    Network(String),
}
