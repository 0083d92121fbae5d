// ── Runtime registrar configuration ──
//
// Describes *how* to talk to OpenSRS: endpoint, reseller credentials,
// timeouts and cache tuning. Never touches disk; the CLI builds a
// `RegistrarConfig` from its profile and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use opensrs_api::Environment;
use secrecy::SecretString;
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System/bundled CA store.
    #[default]
    SystemDefaults,
    /// Also trust a custom CA certificate (e.g. an intercepting proxy).
    CustomCa(PathBuf),
}

/// Lookup/price cache tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            sweep_interval: Duration::from_secs(10 * 60),
        }
    }
}

/// Configuration for one reseller account.
#[derive(Debug, Clone)]
pub struct RegistrarConfig {
    pub environment: Environment,
    /// Overrides the environment's host (tests, proxies).
    pub endpoint: Option<Url>,
    pub username: String,
    pub api_key: SecretString,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// Budget for `SW_REGISTER` (new and transfer) and `RENEW`.
    pub registration_timeout: Duration,
    pub cache: CacheConfig,
}

impl RegistrarConfig {
    pub fn new(environment: Environment, username: &str, api_key: SecretString) -> Self {
        Self {
            environment,
            endpoint: None,
            username: username.to_owned(),
            api_key,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(10),
            registration_timeout: Duration::from_secs(60),
            cache: CacheConfig::default(),
        }
    }

    /// The URL requests are posted to.
    pub fn endpoint_url(&self) -> String {
        self.endpoint
            .as_ref()
            .map_or_else(|| self.environment.endpoint().to_owned(), Url::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_override_wins() {
        let mut cfg = RegistrarConfig::new(
            Environment::Live,
            "reseller",
            SecretString::from("k".to_owned()),
        );
        assert_eq!(cfg.endpoint_url(), opensrs_api::LIVE_ENDPOINT);
        cfg.endpoint = Url::parse("http://127.0.0.1:9999").ok();
        assert_eq!(cfg.endpoint_url(), "http://127.0.0.1:9999/");
    }
}
