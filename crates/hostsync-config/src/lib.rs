//! Shared configuration for hostsync.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `hostsync_core::TowerConfig`. The CLI layers its
//! flag overrides on top of what this crate resolves.

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

use hostsync_core::TowerConfig;
use hostsync_core::config::{DEFAULT_API_VERSION, DEFAULT_TIMEOUT};

/// Keyring service name; entries are keyed `{profile}/password`.
pub const KEYRING_SERVICE: &str = "hostsync";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

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

    /// Named Tower profiles.
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

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            verify_ssl: default_verify_ssl(),
            timeout: default_timeout(),
        }
    }
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.into()
}
fn default_verify_ssl() -> bool {
    true
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

/// A named Tower profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Tower base URL (e.g., "https://tower.example.com").
    pub url: String,

    /// Inventory hosts are registered in.
    pub inventory: Option<String>,

    pub username: Option<String>,

    /// Password (plaintext; prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Override the API version segment.
    pub api_version: Option<String>,

    /// Override TLS verification.
    pub verify_ssl: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "hostsync", "hostsync").map_or_else(
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
    p.push("hostsync");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
///
/// A missing file yields the defaults. A file that exists but does not
/// parse is an error, never silently replaced.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path`, layered over defaults and under `HOSTSYNC_*` env.
///
/// Nested keys use a double underscore: `HOSTSYNC_DEFAULTS__TIMEOUT=10`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("HOSTSYNC_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
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

// ── Credential resolution ───────────────────────────────────────────

/// Keyring account name for a profile's password.
pub fn keyring_account(profile_name: &str) -> String {
    format!("{profile_name}/password")
}

/// Resolve the Tower password for a profile.
///
/// Order: the profile's `password_env` variable, `HOSTSYNC_PASSWORD`,
/// the system keyring, then plaintext in the config file.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_password_with(profile, profile_name, |account| {
        keyring::Entry::new(KEYRING_SERVICE, account)
            .and_then(|entry| entry.get_password())
            .ok()
    })
}

fn resolve_password_with(
    profile: &Profile,
    profile_name: &str,
    keyring_lookup: impl FnOnce(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Well-known env var
    if let Ok(val) = std::env::var("HOSTSYNC_PASSWORD") {
        return Ok(SecretString::from(val));
    }

    // 3. System keyring
    if let Some(secret) = keyring_lookup(&keyring_account(profile_name)) {
        return Ok(SecretString::from(secret));
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

// ── Profile → TowerConfig ───────────────────────────────────────────

/// Build a `TowerConfig` from a profile and an already-resolved password.
///
/// Profile values override `defaults`. Empty username or inventory are
/// passed through; the reconciler rejects them before any request.
pub fn build_tower_config(
    profile: &Profile,
    defaults: &Defaults,
    password: SecretString,
) -> Result<TowerConfig, ConfigError> {
    url::Url::parse(&profile.url).map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("is not a valid URL: {}", profile.url),
    })?;

    Ok(TowerConfig {
        url: profile.url.clone(),
        api_version: profile
            .api_version
            .clone()
            .unwrap_or_else(|| defaults.api_version.clone()),
        username: profile.username.clone().unwrap_or_default(),
        password,
        verify_ssl: profile.verify_ssl.unwrap_or(defaults.verify_ssl),
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        inventory_name: profile.inventory.clone().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "lab"

[defaults]
timeout = 10

[profiles.lab]
url = "https://tower.lab.local"
inventory = "Lab"
username = "svc-hostsync"
password = "plaintext"
verify_ssl = false

[profiles.prod]
url = "https://tower.example.com"
inventory = "Production"
username = "svc-hostsync"
api_version = "v3"
timeout = 60
"#;

    fn load_sample() -> Config {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        load_config_from(&path).unwrap()
    }

    #[test]
    fn loads_profiles_and_defaults() {
        let cfg = load_sample();

        assert_eq!(cfg.default_profile.as_deref(), Some("lab"));
        assert_eq!(cfg.defaults.timeout, 10);
        assert_eq!(cfg.defaults.api_version, "v2");
        assert!(cfg.defaults.verify_ssl);
        assert_eq!(cfg.profiles.len(), 2);
        assert_eq!(cfg.profiles["lab"].inventory.as_deref(), Some("Lab"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
        assert_eq!(cfg.defaults.timeout, 30);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[profiles.prod]\ninventory = \"Production\"\n").unwrap();

        let result = load_config_from(&path);
        assert!(
            matches!(result, Err(ConfigError::Figment(_))),
            "expected a parse error, got: {result:?}"
        );
    }

    #[test]
    fn profile_overrides_defaults() {
        let cfg = load_sample();
        let password = SecretString::from("pw".to_owned());

        let lab = build_tower_config(&cfg.profiles["lab"], &cfg.defaults, password.clone()).unwrap();
        assert_eq!(lab.url, "https://tower.lab.local");
        assert_eq!(lab.api_version, "v2");
        assert_eq!(lab.timeout, Duration::from_secs(10));
        assert!(!lab.verify_ssl);
        assert_eq!(lab.inventory_name, "Lab");

        let prod = build_tower_config(&cfg.profiles["prod"], &cfg.defaults, password).unwrap();
        assert_eq!(prod.api_version, "v3");
        assert_eq!(prod.timeout, Duration::from_secs(60));
        assert!(prod.verify_ssl);
    }

    #[test]
    fn invalid_url_is_rejected() {
        let profile = Profile {
            url: "not a url".into(),
            ..Profile::default()
        };
        let result = build_tower_config(
            &profile,
            &Defaults::default(),
            SecretString::from("pw".to_owned()),
        );
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn keyring_beats_plaintext() {
        let profile = Profile {
            password: Some("plaintext".into()),
            ..Profile::default()
        };
        let secret = resolve_password_with(&profile, "keyring-test-profile", |account| {
            (account == "keyring-test-profile/password").then(|| "from-keyring".to_owned())
        })
        .unwrap();
        assert_eq!(secret.expose_secret(), "from-keyring");
    }

    #[test]
    fn plaintext_is_last_resort() {
        let profile = Profile {
            password: Some("plaintext".into()),
            ..Profile::default()
        };
        let secret = resolve_password_with(&profile, "plain-test-profile", |_| None).unwrap();
        assert_eq!(secret.expose_secret(), "plaintext");
    }

    #[test]
    fn no_password_anywhere() {
        let result = resolve_password_with(&Profile::default(), "empty-test-profile", |_| None);
        match result {
            Err(ConfigError::NoCredentials { profile }) => assert_eq!(profile, "empty-test-profile"),
            other => panic!("expected NoCredentials, got: {other:?}"),
        }
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                url: "https://tower.example.com".into(),
                inventory: Some("Lab".into()),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles["default"].url, "https://tower.example.com");
        assert_eq!(loaded.profiles["default"].inventory.as_deref(), Some("Lab"));
    }
}
