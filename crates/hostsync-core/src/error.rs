// ── Core error types ──
//
// One variant per way a reconciliation run can stop. Every error is terminal
// for the run; nothing here is retried or papered over with a default.
// The `From<hostsync_api::Error>` impl translates transport-layer errors.

use thiserror::Error;

use crate::model::UpsertAction;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("Tower configuration invalid: {field} {reason}")]
    Configuration { field: String, reason: String },

    // ── Transport / API ──────────────────────────────────────────────
    #[error("Cannot reach Tower: {message}")]
    Transport { message: String },

    #[error("Tower API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Unexpected response from {context}: {message}")]
    UnexpectedResponse { context: String, message: String },

    // ── Inventory ────────────────────────────────────────────────────
    #[error("Unable to determine Tower inventory id from inventory name [ {name} ]")]
    InventoryNotFound { name: String },

    // ── VM ───────────────────────────────────────────────────────────
    #[error("Unable to find VM")]
    VmNotFound,

    #[error("Unable to determine a hostname for VM '{vm}'")]
    HostnameUnresolved { vm: String },

    #[error("No IP addresses associated with VM '{hostname}'")]
    NoIpAddress { hostname: String },

    // ── Host record ──────────────────────────────────────────────────
    #[error("Failed to {action} host '{hostname}' (HTTP {status}): {body}")]
    UpsertFailed {
        hostname: String,
        action: UpsertAction,
        status: u16,
        body: String,
    },

    #[error("Failed to add {hostname} to Ansible inventory [ {inventory} ]")]
    VerificationFailed { hostname: String, inventory: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<hostsync_api::Error> for CoreError {
    fn from(err: hostsync_api::Error) -> Self {
        match err {
            hostsync_api::Error::Api { status, body } => CoreError::Api { status, body },
            hostsync_api::Error::Deserialization { message, body: _ } => {
                CoreError::UnexpectedResponse {
                    context: "Tower".into(),
                    message,
                }
            }
            hostsync_api::Error::InvalidUrl(e) => CoreError::Configuration {
                field: "url".into(),
                reason: format!("is not a valid URL: {e}"),
            },
            other @ (hostsync_api::Error::Transport(_)
            | hostsync_api::Error::Timeout { .. }
            | hostsync_api::Error::Tls(_)) => CoreError::Transport {
                message: other.to_string(),
            },
        }
    }
}
