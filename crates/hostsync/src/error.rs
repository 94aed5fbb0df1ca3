//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and one exit code per failure kind.

use miette::Diagnostic;
use thiserror::Error;

use hostsync_config::ConfigError;
use hostsync_core::{CoreError, UpsertAction};

/// Process exit codes. Each reconciliation failure has its own code so
/// callers (workflow engines, cron wrappers) can branch on it.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const TRANSPORT: i32 = 4;
    pub const API: i32 = 5;
    pub const INVENTORY_NOT_FOUND: i32 = 6;
    pub const VM_NOT_FOUND: i32 = 7;
    pub const HOSTNAME_UNRESOLVED: i32 = 8;
    pub const NO_IP_ADDRESS: i32 = 9;
    pub const UPSERT_FAILED: i32 = 10;
    pub const VERIFICATION_FAILED: i32 = 11;
    pub const UNEXPECTED_RESPONSE: i32 = 12;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration file not found")]
    #[diagnostic(
        code(hostsync::no_config),
        help(
            "Create one with: hostsync config init\n\
             Expected at: {path}\n\
             Or pass --url, --username, --password and --inventory."
        )
    )]
    NoConfig { path: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(hostsync::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: hostsync config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(hostsync::no_credentials),
        help(
            "Store one with: hostsync config set-password --profile {profile}\n\
             Or set the HOSTSYNC_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    #[error("Invalid Tower configuration: {field} {reason}")]
    #[diagnostic(
        code(hostsync::config_invalid),
        help("Set it in your profile (hostsync config set {field} <value>) or pass it as a flag.")
    )]
    ConfigInvalid { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(hostsync::config))]
    Config(Box<figment::Error>),

    // ── Tower connectivity ───────────────────────────────────────────

    #[error("Could not reach Tower")]
    #[diagnostic(
        code(hostsync::connection_failed),
        help(
            "{message}\n\
             Check the URL and that Tower is reachable. For self-signed certificates use --insecure (-k)."
        )
    )]
    ConnectionFailed { message: String },

    #[error("Tower rejected the credentials (HTTP {status})")]
    #[diagnostic(
        code(hostsync::auth_failed),
        help("Verify the username and password for this profile.")
    )]
    AuthFailed { status: u16 },

    #[error("Tower API error (HTTP {status})")]
    #[diagnostic(code(hostsync::api_error), help("Response: {body}"))]
    ApiError { status: u16, body: String },

    #[error("Unexpected response from {context}")]
    #[diagnostic(code(hostsync::unexpected_response), help("{message}"))]
    UnexpectedResponse { context: String, message: String },

    // ── Reconciliation ───────────────────────────────────────────────

    #[error("Unable to determine Tower inventory id from inventory name [ {name} ]")]
    #[diagnostic(
        code(hostsync::inventory_not_found),
        help("Check the inventory name (it is matched exactly) and that the user can see it.")
    )]
    InventoryNotFound { name: String },

    #[error("Unable to find VM")]
    #[diagnostic(
        code(hostsync::vm_not_found),
        help("Describe the VM with --vm-name / --hostname / --ip or --vm-file.")
    )]
    VmNotFound,

    #[error("Unable to determine a hostname for VM '{vm}'")]
    #[diagnostic(
        code(hostsync::hostname_unresolved),
        help("Pass --hostname or --vm-name.")
    )]
    HostnameUnresolved { vm: String },

    #[error("No IP addresses associated with VM '{hostname}'")]
    #[diagnostic(code(hostsync::no_ip_address), help("Pass at least one --ip."))]
    NoIpAddress { hostname: String },

    #[error("Failed to {action} host '{hostname}' (HTTP {status})")]
    #[diagnostic(code(hostsync::upsert_failed), help("Response: {body}"))]
    UpsertFailed {
        hostname: String,
        action: UpsertAction,
        status: u16,
        body: String,
    },

    #[error("Failed to add {hostname} to Ansible inventory [ {inventory} ]")]
    #[diagnostic(
        code(hostsync::verification_failed),
        help("Tower accepted the write but does not list the host. The record was not rolled back.")
    )]
    VerificationFailed { hostname: String, inventory: String },

    // ── Validation / interactive ─────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(hostsync::validation))]
    Validation { field: String, reason: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid VM file: {0}")]
    #[diagnostic(
        code(hostsync::vm_file),
        help("Expected a JSON object like {{\"name\": \"web01\", \"ipaddresses\": [\"10.0.0.5\"]}}.")
    )]
    VmFile(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoConfig { .. }
            | Self::ProfileNotFound { .. }
            | Self::NoCredentials { .. }
            | Self::ConfigInvalid { .. }
            | Self::Config(_) => exit_code::CONFIG,
            Self::ConnectionFailed { .. } => exit_code::TRANSPORT,
            Self::AuthFailed { .. } | Self::ApiError { .. } => exit_code::API,
            Self::UnexpectedResponse { .. } => exit_code::UNEXPECTED_RESPONSE,
            Self::InventoryNotFound { .. } => exit_code::INVENTORY_NOT_FOUND,
            Self::VmNotFound => exit_code::VM_NOT_FOUND,
            Self::HostnameUnresolved { .. } => exit_code::HOSTNAME_UNRESOLVED,
            Self::NoIpAddress { .. } => exit_code::NO_IP_ADDRESS,
            Self::UpsertFailed { .. } => exit_code::UPSERT_FAILED,
            Self::VerificationFailed { .. } => exit_code::VERIFICATION_FAILED,
            Self::Validation { .. } | Self::VmFile(_) => exit_code::USAGE,
            Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Configuration { field, reason } => CliError::ConfigInvalid { field, reason },
            CoreError::Transport { message } => CliError::ConnectionFailed { message },
            CoreError::Api { status, body } => {
                if matches!(status, 401 | 403) {
                    CliError::AuthFailed { status }
                } else {
                    CliError::ApiError { status, body }
                }
            }
            CoreError::UnexpectedResponse { context, message } => {
                CliError::UnexpectedResponse { context, message }
            }
            CoreError::InventoryNotFound { name } => CliError::InventoryNotFound { name },
            CoreError::VmNotFound => CliError::VmNotFound,
            CoreError::HostnameUnresolved { vm } => CliError::HostnameUnresolved { vm },
            CoreError::NoIpAddress { hostname } => CliError::NoIpAddress { hostname },
            CoreError::UpsertFailed {
                hostname,
                action,
                status,
                body,
            } => CliError::UpsertFailed {
                hostname,
                action,
                status,
                body,
            },
            CoreError::VerificationFailed {
                hostname,
                inventory,
            } => CliError::VerificationFailed {
                hostname,
                inventory,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::ConfigInvalid { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: format!("failed to serialize config: {e}"),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
