//! Shared configuration for OpenSRS tools.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `opensrs_core::RegistrarConfig`. The CLI layers
//! its `GlobalOpts` flag overrides on top of this.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use opensrs_core::{CacheConfig, Environment, RegistrarConfig, TlsVerification};

/// Service name under which API keys live in the system keyring.
pub const KEYRING_SERVICE: &str = "opensrs";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String, available: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named reseller profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up a profile, listing the known names when it is missing.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.into(),
                available: self.available_profiles(),
            })
    }

    /// Profile names in stable order.
    pub fn profile_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn available_profiles(&self) -> String {
        if self.profiles.is_empty() {
            "(none)".into()
        } else {
            self.profile_names().join(", ")
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Seconds allowed for ordinary commands.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Seconds allowed for registrations, transfers and renewals.
    #[serde(default = "default_registration_timeout")]
    pub registration_timeout: u64,

    /// Lookup/price cache lifetime in seconds.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            registration_timeout: default_registration_timeout(),
            cache_ttl: default_cache_ttl(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_registration_timeout() -> u64 {
    60
}
fn default_cache_ttl() -> u64 {
    300
}

/// One reseller account.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Reseller username (sent as `X-Username`).
    #[serde(default)]
    pub username: String,

    /// API key in plaintext. Prefer the keyring or `api_key_env`.
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// `test` (horizon sandbox) or `live`.
    #[serde(default)]
    pub environment: Environment,

    /// Endpoint override, e.g. a local proxy.
    pub endpoint: Option<String>,

    /// Path to an extra CA certificate.
    pub ca_cert: Option<PathBuf>,

    pub timeout: Option<u64>,
    pub registration_timeout: Option<u64>,
    pub cache_ttl: Option<u64>,
}

/// Keys accepted by [`Profile::set_field`].
pub const PROFILE_KEYS: &[&str] = &[
    "username",
    "api_key",
    "api_key_env",
    "environment",
    "endpoint",
    "ca_cert",
    "timeout",
    "registration_timeout",
    "cache_ttl",
];

fn parse_secs(field: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: "must be a number (seconds)".into(),
    })
}

impl Profile {
    /// Set one field from its string form. Dashes and underscores are
    /// interchangeable in `key`.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key.replace('-', "_").as_str() {
            "username" => self.username = value.into(),
            "api_key" => self.api_key = Some(value.into()),
            "api_key_env" => self.api_key_env = Some(value.into()),
            "environment" => {
                self.environment = value.parse().map_err(|_| ConfigError::Validation {
                    field: "environment".into(),
                    reason: "must be 'test' or 'live'".into(),
                })?;
            }
            "endpoint" => {
                url::Url::parse(value).map_err(|_| ConfigError::Validation {
                    field: "endpoint".into(),
                    reason: format!("invalid URL: {value}"),
                })?;
                self.endpoint = Some(value.into());
            }
            "ca_cert" => self.ca_cert = Some(value.into()),
            "timeout" => self.timeout = Some(parse_secs("timeout", value)?),
            "registration_timeout" => {
                self.registration_timeout = Some(parse_secs("registration_timeout", value)?);
            }
            "cache_ttl" => self.cache_ttl = Some(parse_secs("cache_ttl", value)?),
            other => {
                return Err(ConfigError::Validation {
                    field: other.into(),
                    reason: format!(
                        "unknown config key '{other}'. Valid keys: {}",
                        PROFILE_KEYS.join(", ")
                    ),
                });
            }
        }
        Ok(())
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "opensrs", "opensrs").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("opensrs");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path`, then apply `OPENSRS_` variables (`__` separates
/// nesting, e.g. `OPENSRS_DEFAULTS__TIMEOUT`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("OPENSRS_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credentials ─────────────────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/api-key"))
}

/// Resolve an API key from the credential chain (no CLI flag step).
pub fn resolve_api_key(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's api_key_env → env var lookup
    if let Some(ref env_name) = profile.api_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref key) = profile.api_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a profile's API key in the system keyring.
pub fn store_api_key(profile_name: &str, api_key: &str) -> Result<(), ConfigError> {
    if api_key.is_empty() {
        return Err(ConfigError::Validation {
            field: "api_key".into(),
            reason: "API key cannot be empty".into(),
        });
    }
    keyring_entry(profile_name)?.set_password(api_key)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `RegistrarConfig` from a profile, without CLI overrides.
///
/// Unset profile timeouts fall back to `defaults`.
pub fn profile_to_registrar_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<RegistrarConfig, ConfigError> {
    if profile.username.trim().is_empty() {
        return Err(ConfigError::NoCredentials {
            profile: profile_name.into(),
        });
    }
    let api_key = resolve_api_key(profile, profile_name)?;
    registrar_config_with_key(profile, defaults, api_key)
}

/// Same as [`profile_to_registrar_config`] with an already-resolved key.
pub fn registrar_config_with_key(
    profile: &Profile,
    defaults: &Defaults,
    api_key: SecretString,
) -> Result<RegistrarConfig, ConfigError> {
    let mut cfg = RegistrarConfig::new(profile.environment, &profile.username, api_key);

    if let Some(ref raw) = profile.endpoint {
        let url = url::Url::parse(raw).map_err(|_| ConfigError::Validation {
            field: "endpoint".into(),
            reason: format!("invalid URL: {raw}"),
        })?;
        cfg.endpoint = Some(url);
    }

    if let Some(ref ca_path) = profile.ca_cert {
        cfg.tls = TlsVerification::CustomCa(ca_path.clone());
    }

    cfg.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    cfg.registration_timeout = Duration::from_secs(
        profile
            .registration_timeout
            .unwrap_or(defaults.registration_timeout),
    );
    cfg.cache = CacheConfig {
        ttl: Duration::from_secs(profile.cache_ttl.unwrap_or(defaults.cache_ttl)),
        ..CacheConfig::default()
    };

    Ok(cfg)
}
