use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the `opensrs-api` crate.
///
/// Covers every failure mode of a registrar round trip: local validation,
/// XML construction, transport, HTTP-level rejection, vendor-reported
/// failures, and response parsing. `opensrs-core` maps these into
/// user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Validation ──────────────────────────────────────────────────
    /// Input rejected before any XML was built.
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    // ── Authentication ──────────────────────────────────────────────
    /// The endpoint rejected the reseller username or signature.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out. `timeout` is the limit that was applied.
    #[error("Request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Non-success HTTP status that carries no OPS envelope.
    #[error("Unexpected HTTP status {status}")]
    Http { status: u16, body: String },

    // ── Registrar ───────────────────────────────────────────────────
    /// The registrar answered with `is_success = 0`.
    #[error("Registrar error {code}: {text}")]
    Registrar { code: u32, text: String },

    // ── Data ────────────────────────────────────────────────────────
    /// Failed to serialize a request envelope.
    #[error("XML encoding error: {0}")]
    Encoding(String),

    /// The response body was not a well-formed OPS envelope.
    #[error("Parse error: {message}")]
    Parse { message: String, body: String },
}

impl Error {
    /// Returns `true` if the credentials were rejected.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// The `responseCode` reported in JSON error bodies.
    ///
    /// Vendor failures keep the numeric registrar code; everything else maps
    /// onto a symbolic code.
    pub fn response_code(&self) -> String {
        match self {
            Self::Registrar { code, .. } => code.to_string(),
            Self::Timeout { .. } => "ECONNABORTED".into(),
            Self::Transport(e) if e.is_timeout() => "ECONNABORTED".into(),
            Self::Transport(_) | Self::Tls(_) | Self::InvalidUrl(_) => "NETWORK_ERROR".into(),
            Self::Http { status, .. } => status.to_string(),
            Self::Authentication { .. } => "AUTH_ERROR".into(),
            Self::Validation { .. } => "VALIDATION_ERROR".into(),
            Self::Encoding(_) | Self::Parse { .. } => "PARSE_ERROR".into(),
        }
    }

    /// The `responseText` reported in JSON error bodies.
    pub fn response_text(&self) -> String {
        match self {
            Self::Registrar { text, .. } => text.clone(),
            other => other.to_string(),
        }
    }

    pub(crate) fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
