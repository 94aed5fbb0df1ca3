use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the `hostsync-api` crate.
///
/// Covers every way a single Tower REST call can fail: the request never
/// completing, the server answering with a non-2xx status, or a 2xx answer
/// whose body is not the JSON object we expect. `hostsync-core` maps these
/// into workflow-level errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, body read, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup error while building the HTTP client.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Tower API ───────────────────────────────────────────────────
    /// The server answered with a status outside 200..=299.
    #[error("Tower API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// A 2xx body that is not a JSON object, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}
