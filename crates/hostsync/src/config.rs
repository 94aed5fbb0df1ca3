//! CLI configuration: a thin wrapper around `hostsync_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--url, --inventory, --password, etc.) on top of the active profile.

use secrecy::SecretString;

use hostsync_core::TowerConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use hostsync_config::{
    Config, Profile, config_path, keyring_account, load_config, save_config,
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

/// Comma-separated profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

/// Build the `TowerConfig` for this invocation.
///
/// Flags (and their `HOSTSYNC_*` env vars) take priority over the profile.
/// Without a stored profile, `--url` alone is enough to proceed; anything
/// else missing is reported by the reconciler's own validation.
pub fn resolve_tower_config(global: &GlobalOpts) -> Result<TowerConfig, CliError> {
    let cfg = load_config()?;
    let profile_name = active_profile_name(global, &cfg);
    let stored = cfg.profiles.get(&profile_name);

    if stored.is_none() {
        if global.profile.is_some() {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        if global.url.is_none() {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    }

    let empty = Profile::default();
    let profile = apply_overrides(stored.unwrap_or(&empty), global);

    let password = match global.password {
        Some(ref pw) => SecretString::from(pw.clone()),
        None => hostsync_config::resolve_password(&profile, &profile_name)?,
    };

    Ok(hostsync_config::build_tower_config(
        &profile,
        &cfg.defaults,
        password,
    )?)
}

/// Layer CLI flags over a stored profile.
fn apply_overrides(profile: &Profile, global: &GlobalOpts) -> Profile {
    Profile {
        url: global.url.clone().unwrap_or_else(|| profile.url.clone()),
        inventory: global.inventory.clone().or_else(|| profile.inventory.clone()),
        username: global.username.clone().or_else(|| profile.username.clone()),
        password: profile.password.clone(),
        password_env: profile.password_env.clone(),
        api_version: global
            .api_version
            .clone()
            .or_else(|| profile.api_version.clone()),
        verify_ssl: if global.insecure {
            Some(false)
        } else {
            profile.verify_ssl
        },
        timeout: global.timeout.or(profile.timeout),
    }
}
