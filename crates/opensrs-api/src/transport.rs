// Shared transport configuration for building reqwest::Client instances.
//
// Endpoint selection (test vs live), TLS roots and per-call timeouts live
// here so the client only deals with envelopes and signatures.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// OpenSRS test environment.
pub const TEST_ENDPOINT: &str = "https://horizon.opensrs.net:55443";

/// OpenSRS production environment.
pub const LIVE_ENDPOINT: &str = "https://rr-n1-tor.opensrs.net:55443";

/// Which OpenSRS environment to talk to.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Environment {
    /// The horizon sandbox. Default, so nothing is purchased by accident.
    #[default]
    Test,
    /// Production.
    Live,
}

impl Environment {
    /// Base URL of the XML endpoint for this environment.
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Test => TEST_ENDPOINT,
            Self::Live => LIVE_ENDPOINT,
        }
    }
}

/// TLS verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the bundled/system certificate roots.
    #[default]
    System,
    /// Additionally trust a CA certificate from the given PEM file.
    CustomCa(PathBuf),
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Timeout for ordinary commands.
    pub timeout: Duration,
    /// Timeout for registrations and transfers, which the registrar
    /// processes synchronously.
    pub registration_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(10),
            registration_timeout: Duration::from_secs(60),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    ///
    /// No client-wide timeout is set: every request carries its own.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("opensrs-rs/", env!("CARGO_PKG_VERSION")));

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path).map_err(|e| {
                    crate::error::Error::Tls(format!("failed to read CA cert: {e}"))
                })?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| crate::error::Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
        }

        builder
            .build()
            .map_err(|e| crate::error::Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_parses_case_insensitively() {
        assert_eq!("LIVE".parse::<Environment>().ok(), Some(Environment::Live));
        assert_eq!(Environment::Test.to_string(), "test");
        assert_eq!(Environment::Test.endpoint(), TEST_ENDPOINT);
    }
}
