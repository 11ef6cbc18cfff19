//! Ekispert client error types.

use std::fmt;

/// Errors from the Ekispert HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum EkispertError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API key rejected (401/403, invalid key or exhausted quota)
    #[error("unauthorized (rejected API key or exhausted quota)")]
    Unauthorized,

    /// Upstream could not resolve a station name (error code E102)
    #[error("station not found: {message}")]
    StationNotFound {
        /// The upstream's human-readable message, relayed to the caller
        message: String,
    },

    /// API returned any other error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// 2xx response with an unparsable body
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },
}

/// Coarse failure classification driving the resolver's fallback
/// decision: only `StationNotFound` bypasses the stale-cache lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Credentials rejected by the upstream
    Auth,
    /// Endpoint name unresolved by the upstream
    StationNotFound,
    /// Network failure, timeout, or any other non-2xx
    Transient,
    /// 2xx but unparsable body
    MalformedResponse,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::Auth => "authentication failure",
            FailureKind::StationNotFound => "station not found",
            FailureKind::Transient => "transient upstream failure",
            FailureKind::MalformedResponse => "malformed upstream response",
        };
        write!(f, "{label}")
    }
}

impl EkispertError {
    /// Classify this error for the fallback decision.
    pub fn kind(&self) -> FailureKind {
        match self {
            EkispertError::Unauthorized => FailureKind::Auth,
            EkispertError::StationNotFound { .. } => FailureKind::StationNotFound,
            EkispertError::Http(_) | EkispertError::Api { .. } => FailureKind::Transient,
            EkispertError::Json { .. } => FailureKind::MalformedResponse,
        }
    }
}
