// ── Core error types ──
//
// User-facing errors from opensrs-core. Consumers never see raw transport
// or XML failures; the `From<opensrs_api::Error>` impl folds them into
// domain-level variants while keeping the registrar's response code.

use std::time::Duration;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach OpenSRS at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("OpenSRS request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    // ── Local rejections (no request sent) ───────────────────────────
    #[error("Invalid {field}: {message}")]
    ValidationFailed { field: String, message: String },

    /// More than one record matched and no address was given to pick one.
    #[error("{count} {record_type} records match '{subdomain}': multiple matches, specify address")]
    AmbiguousMatch {
        record_type: String,
        subdomain: String,
        count: usize,
    },

    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    // ── Registrar errors ─────────────────────────────────────────────
    /// The registrar processed the command and refused it.
    #[error("OpenSRS rejected the request ({code}): {message}")]
    Rejected { code: u32, message: String },

    #[error("Unexpected HTTP status {status} from OpenSRS")]
    Http { status: u16 },

    #[error("Could not parse OpenSRS response: {message}")]
    Parse { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// `responseCode` for the JSON envelope.
    pub fn response_code(&self) -> String {
        match self {
            Self::Rejected { code, .. } => code.to_string(),
            Self::Timeout { .. } => "ECONNABORTED".into(),
            Self::ConnectionFailed { .. } => "NETWORK_ERROR".into(),
            Self::AuthenticationFailed { .. } => "AUTH_ERROR".into(),
            Self::ValidationFailed { .. } | Self::AmbiguousMatch { .. } => {
                "VALIDATION_ERROR".into()
            }
            Self::NotFound { .. } => "NOT_FOUND".into(),
            Self::Conflict { .. } => "CONFLICT".into(),
            Self::Http { status } => status.to_string(),
            Self::Parse { .. } => "PARSE_ERROR".into(),
            Self::Config { .. } => "CONFIG_ERROR".into(),
            Self::Internal(_) => "INTERNAL_ERROR".into(),
        }
    }

    /// `responseText` for the JSON envelope.
    pub fn response_text(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<opensrs_api::Error> for CoreError {
    fn from(err: opensrs_api::Error) -> Self {
        match err {
            opensrs_api::Error::Validation { field, reason } => CoreError::ValidationFailed {
                field,
                message: reason,
            },
            opensrs_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            // The client reports its own timeouts as `Timeout`, which carries
            // the applied limit.
            opensrs_api::Error::Transport(ref e) => CoreError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string),
                reason: e.to_string(),
            },
            opensrs_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid endpoint URL: {e}"),
            },
            opensrs_api::Error::Timeout { timeout } => CoreError::Timeout { timeout },
            opensrs_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            opensrs_api::Error::Http { status, body: _ } => CoreError::Http { status },
            opensrs_api::Error::Registrar { code, text } => CoreError::Rejected {
                code,
                message: text,
            },
            opensrs_api::Error::Encoding(message) => {
                CoreError::Internal(format!("XML encoding error: {message}"))
            }
            opensrs_api::Error::Parse { message, body: _ } => CoreError::Parse { message },
        }
    }
}
