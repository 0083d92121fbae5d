//! Config subcommand handlers.

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Hide plaintext keys before anything is printed.
fn redact(cfg: &mut Config) {
    for profile in cfg.profiles.values_mut() {
        if profile.api_key.is_some() {
            profile.api_key = Some(REDACTED.into());
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("OpenSRS CLI configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            // 1. Profile name
            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            // 2. Reseller username
            let username: String = Input::new()
                .with_prompt("Reseller username")
                .interact_text()
                .map_err(prompt_err)?;

            // 3. Environment
            let env_choices = &["test (horizon sandbox)", "live"];
            let env_selection = Select::new()
                .with_prompt("Environment")
                .items(env_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;
            let environment = if env_selection == 0 {
                opensrs_core::Environment::Test
            } else {
                opensrs_core::Environment::Live
            };

            // 4. API key
            let key = rpassword::prompt_password("API key: ").map_err(prompt_err)?;
            if key.is_empty() {
                return Err(CliError::Validation {
                    field: "api_key".into(),
                    reason: "API key cannot be empty".into(),
                });
            }

            let store_choices = &[
                "Store in system keyring (recommended)",
                "Save to config file (plaintext)",
            ];
            let store_selection = Select::new()
                .with_prompt("Where to store the API key?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let api_key = if store_selection == 0 {
                opensrs_config::store_api_key(&profile_name, &key)?;
                eprintln!("   ✓ API key stored in system keyring");
                None
            } else {
                Some(key)
            };

            // 5. Build profile and config, keeping any existing profiles
            let profile = Profile {
                username,
                api_key,
                environment,
                ..Profile::default()
            };

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());

            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: opensrs account balance");

            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let mut cfg = config::load_config_or_default();
            redact(&mut cfg);
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|e| format!("{c:#?}\n({e})")),
                |c| c.default_profile.clone().unwrap_or_default(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);

            cfg.profiles
                .entry(profile_name.clone())
                .or_default()
                .set_field(&key, &value)?;

            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Set {key} on profile '{profile_name}'");
            }
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: opensrs config init");
            } else {
                for name in cfg.profile_names() {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            cfg.profile(&name)?;

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Default profile set to '{name}'");
            }
            Ok(())
        }

        // ── SetKey ──────────────────────────────────────────────────
        ConfigCommand::SetKey { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            cfg.profile(&profile_name)?;

            let secret = rpassword::prompt_password("API key: ").map_err(prompt_err)?;
            opensrs_config::store_api_key(&profile_name, &secret)?;

            if !global.quiet {
                eprintln!("✓ API key stored in system keyring for profile '{profile_name}'");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_hides_plaintext_keys_only() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "a".into(),
            Profile {
                api_key: Some("secret".into()),
                ..Profile::default()
            },
        );
        cfg.profiles.insert("b".into(), Profile::default());
        redact(&mut cfg);
        assert_eq!(cfg.profiles["a"].api_key.as_deref(), Some(REDACTED));
        assert_eq!(cfg.profiles["b"].api_key, None);
    }
}
