// ── Runtime connection configuration ──
//
// Describes *which* Tower to talk to and *where* the host goes. Built by the
// CLI from profiles, env and flags, then handed to `HostReconciler`. Core
// never reads config files.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::CoreError;

pub const DEFAULT_API_VERSION: &str = "v2";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection and target settings for one reconciliation run.
#[derive(Debug, Clone)]
pub struct TowerConfig {
    /// Tower root URL (e.g. `https://tower.example.com`).
    pub url: String,
    /// API version segment, `v2` on every current AWX release.
    pub api_version: String,
    pub username: String,
    pub password: SecretString,
    /// Verify the server certificate.
    pub verify_ssl: bool,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Name of the inventory the host belongs in.
    pub inventory_name: String,
}

impl TowerConfig {
    /// Check that every required field is set.
    ///
    /// Runs before any request is built; the first empty field wins.
    pub fn validate(&self) -> Result<(), CoreError> {
        let required = [
            ("url", self.url.as_str()),
            ("api_version", self.api_version.as_str()),
            ("username", self.username.as_str()),
            ("password", self.password.expose_secret()),
            ("inventory_name", self.inventory_name.as_str()),
        ];

        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(CoreError::Configuration {
                field: (*field).to_owned(),
                reason: "must not be empty".into(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TowerConfig {
        TowerConfig {
            url: "https://tower.example.com".into(),
            api_version: DEFAULT_API_VERSION.into(),
            username: "admin".into(),
            password: SecretString::from("secret".to_owned()),
            verify_ssl: true,
            timeout: DEFAULT_TIMEOUT,
            inventory_name: "Lab".into(),
        }
    }

    #[test]
    fn complete_config_is_valid() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn empty_password_is_rejected() {
        let cfg = TowerConfig {
            password: SecretString::from(String::new()),
            ..config()
        };
        match cfg.validate() {
            Err(CoreError::Configuration { field, .. }) => assert_eq!(field, "password"),
            other => panic!("expected Configuration error, got: {other:?}"),
        }
    }

    #[test]
    fn blank_inventory_is_rejected() {
        let cfg = TowerConfig {
            inventory_name: "   ".into(),
            ..config()
        };
        match cfg.validate() {
            Err(CoreError::Configuration { field, .. }) => assert_eq!(field, "inventory_name"),
            other => panic!("expected Configuration error, got: {other:?}"),
        }
    }

    #[test]
    fn url_is_checked_first() {
        let cfg = TowerConfig {
            url: String::new(),
            username: String::new(),
            ..config()
        };
        match cfg.validate() {
            Err(CoreError::Configuration { field, .. }) => assert_eq!(field, "url"),
            other => panic!("expected Configuration error, got: {other:?}"),
        }
    }
}
