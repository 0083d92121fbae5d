//! CLI configuration: a thin layer over `opensrs_config`.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--username, --api-key, etc.).

use std::time::Duration;

use secrecy::SecretString;

use opensrs_core::{Environment, RegistrarConfig};

use crate::cli::{EnvironmentArg, GlobalOpts};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use opensrs_config::{
    Config, Profile, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

impl From<EnvironmentArg> for Environment {
    fn from(arg: EnvironmentArg) -> Self {
        match arg {
            EnvironmentArg::Test => Self::Test,
            EnvironmentArg::Live => Self::Live,
        }
    }
}

/// Build a `RegistrarConfig` from the config file, profile, and CLI
/// overrides. Without a matching profile, flags and env vars alone must
/// supply the credentials.
pub fn build_registrar_config(global: &GlobalOpts) -> Result<RegistrarConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    // An explicitly requested profile must exist.
    let profile = match cfg.profiles.get(&profile_name) {
        Some(p) => p.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: cfg.available_profiles(),
            });
        }
        None => Profile::default(),
    };

    resolve_profile(profile, &profile_name, &cfg, global)
}

/// Translate a `Profile` + global flags into a `RegistrarConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    mut profile: Profile,
    profile_name: &str,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<RegistrarConfig, CliError> {
    // 1. Username and environment (flag > env > profile)
    if let Some(ref username) = global.username {
        profile.username.clone_from(username);
    }
    if let Some(env) = global.environment {
        profile.environment = env.into();
    }
    if profile.username.trim().is_empty() {
        return Err(CliError::NoCredentials {
            profile: profile_name.into(),
        });
    }

    // 2. API key: the flag wins, then the shared resolution chain
    let api_key = match global.api_key {
        Some(ref key) => SecretString::from(key.clone()),
        None => opensrs_config::resolve_api_key(&profile, profile_name)?,
    };
    let mut registrar =
        opensrs_config::registrar_config_with_key(&profile, &cfg.defaults, api_key)?;

    // 3. Endpoint override
    if let Some(ref raw) = global.endpoint {
        let url = url::Url::parse(raw).map_err(|_| CliError::Validation {
            field: "endpoint".into(),
            reason: format!("invalid URL: {raw}"),
        })?;
        registrar.endpoint = Some(url);
    }

    // 4. Timeout
    if let Some(secs) = global.timeout {
        registrar.timeout = Duration::from_secs(secs);
    }

    Ok(registrar)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;
    use secrecy::ExposeSecret;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["opensrs"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["account", "balance"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn flags_override_profile() {
        let profile = Profile {
            username: "from-profile".into(),
            api_key: Some("profile-key".into()),
            timeout: Some(30),
            ..Profile::default()
        };
        let g = global(&[
            "--username",
            "from-flag",
            "--api-key",
            "flag-key",
            "--environment",
            "live",
            "--endpoint",
            "http://127.0.0.1:1234",
            "--timeout",
            "5",
        ]);
        let rc = resolve_profile(profile, "cli-test", &Config::default(), &g).unwrap();
        assert_eq!(rc.username, "from-flag");
        assert_eq!(rc.api_key.expose_secret(), "flag-key");
        assert_eq!(rc.environment, Environment::Live);
        assert_eq!(rc.endpoint_url(), "http://127.0.0.1:1234/");
        assert_eq!(rc.timeout, Duration::from_secs(5));
    }

    #[test]
    fn profile_values_apply_without_flags() {
        let profile = Profile {
            username: "reseller".into(),
            api_key: Some("k".into()),
            timeout: Some(30),
            ..Profile::default()
        };
        let rc = resolve_profile(profile, "cli-test", &Config::default(), &global(&[])).unwrap();
        assert_eq!(rc.environment, Environment::Test);
        assert_eq!(rc.timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_username_is_no_credentials() {
        let err = resolve_profile(
            Profile::default(),
            "cli-test",
            &Config::default(),
            &global(&["--api-key", "k"]),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::NoCredentials { .. }), "got: {err:?}");
    }
}
