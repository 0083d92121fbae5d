//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use opensrs_config::ConfigError;
use opensrs_core::{CoreError, Envelope};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const REJECTED: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach OpenSRS at {url}")]
    #[diagnostic(
        code(opensrs::connection_failed),
        help(
            "{reason}\n\
             Check network access to the endpoint, or pick another with --environment / --endpoint."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout:?}")]
    #[diagnostic(
        code(opensrs::timeout),
        help("Increase the timeout with --timeout or the profile's `timeout` / `registration_timeout`.")
    )]
    Timeout { timeout: std::time::Duration },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(opensrs::auth_failed),
        help(
            "Verify the reseller username and API key, and that this machine's IP is\n\
             allowed in the reseller control panel.\n\
             Store a new key with: opensrs config set-key"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(opensrs::no_credentials),
        help(
            "Configure credentials with: opensrs config init\n\
             Or set OPENSRS_USERNAME and OPENSRS_API_KEY."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} not found: {identifier}")]
    #[diagnostic(code(opensrs::not_found))]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    #[error("{message}")]
    #[diagnostic(code(opensrs::conflict))]
    Conflict { message: String },

    #[error("{count} {record_type} records match '{selector}': multiple matches, specify address")]
    #[diagnostic(
        code(opensrs::ambiguous_match),
        help("Pass --address (remove) or --match-address (update) to pick one record.")
    )]
    AmbiguousMatch {
        record_type: String,
        selector: String,
        count: usize,
    },

    // ── Registrar ────────────────────────────────────────────────────

    #[error("OpenSRS rejected the request ({code}): {message}")]
    #[diagnostic(code(opensrs::rejected))]
    Rejected { code: u32, message: String },

    #[error("API error ({code}): {message}")]
    #[diagnostic(code(opensrs::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(opensrs::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(opensrs::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: opensrs config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(opensrs::no_config),
        help(
            "Create one with: opensrs config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(opensrs::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(opensrs::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(opensrs::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::ProfileNotFound { name, available } => {
                Self::ProfileNotFound { name, available }
            }
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config(other),
        }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Validation { .. }
            | Self::AmbiguousMatch { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// `responseCode` when the failure is rendered as an envelope.
    pub fn response_code(&self) -> String {
        match self {
            Self::Rejected { code, .. } => code.to_string(),
            Self::ApiError { code, .. } => code.clone(),
            Self::Timeout { .. } => "ECONNABORTED".into(),
            Self::ConnectionFailed { .. } => "NETWORK_ERROR".into(),
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => "AUTH_ERROR".into(),
            Self::NotFound { .. } => "NOT_FOUND".into(),
            Self::Conflict { .. } => "CONFLICT".into(),
            Self::Validation { .. }
            | Self::AmbiguousMatch { .. }
            | Self::NonInteractiveRequiresYes { .. } => "VALIDATION_ERROR".into(),
            Self::ProfileNotFound { .. } | Self::NoConfig { .. } | Self::Config(_) => {
                "CONFIG_ERROR".into()
            }
            Self::Io(_) | Self::Json(_) => "INTERNAL_ERROR".into(),
        }
    }

    /// The failure envelope printed on stdout for structured output.
    pub fn envelope(&self) -> Envelope<()> {
        let text = match self {
            Self::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        };
        Envelope::failure(self.to_string(), self.response_code(), text)
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout { timeout } => CliError::Timeout { timeout },

            CoreError::ValidationFailed { field, message } => CliError::Validation {
                field,
                reason: message,
            },

            CoreError::AmbiguousMatch {
                record_type,
                subdomain,
                count,
            } => CliError::AmbiguousMatch {
                record_type,
                selector: subdomain,
                count,
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                resource_type: entity_type,
                identifier,
            },

            CoreError::Conflict { message } => CliError::Conflict { message },

            CoreError::Rejected { code, message } => CliError::Rejected { code, message },

            CoreError::Http { status } => CliError::ApiError {
                code: status.to_string(),
                message: format!("unexpected HTTP status {status}"),
            },

            CoreError::Parse { message } => CliError::ApiError {
                code: "PARSE_ERROR".into(),
                message,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::ApiError {
                code: "INTERNAL_ERROR".into(),
                message,
            },
        }
    }
}
