//! Clap derive structures for the `hostsync` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// hostsync -- keep VM host records in Ansible Tower / AWX inventories
#[derive(Debug, Parser)]
#[command(
    name = "hostsync",
    version,
    about = "Register virtual machines as hosts in Ansible Tower / AWX inventories",
    long_about = "Looks up a Tower inventory by name, creates or updates the host record \n\
        for a VM (setting ansible_host to its IP address), and verifies that \n\
        Tower reports the host afterwards.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Tower profile to use
    #[arg(long, short = 'p', env = "HOSTSYNC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Tower base URL (overrides profile)
    #[arg(long, short = 'u', env = "HOSTSYNC_URL", global = true)]
    pub url: Option<String>,

    /// Tower username (overrides profile)
    #[arg(long, env = "HOSTSYNC_USERNAME", global = true)]
    pub username: Option<String>,

    /// Tower password (prefer the keyring: `hostsync config set-password`)
    #[arg(long, env = "HOSTSYNC_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Target inventory name (overrides profile)
    #[arg(long, short = 'i', env = "HOSTSYNC_INVENTORY", global = true)]
    pub inventory: Option<String>,

    /// Tower API version segment
    #[arg(long, env = "HOSTSYNC_API_VERSION", global = true)]
    pub api_version: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, short = 'k', env = "HOSTSYNC_INSECURE", global = true)]
    pub insecure: bool,

    /// Per-request timeout in seconds
    #[arg(long, env = "HOSTSYNC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "HOSTSYNC_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create or update a VM's host record in the target inventory
    #[command(alias = "add")]
    AddHost(AddHostArgs),

    /// Manage profiles and credentials
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── add-host ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AddHostArgs {
    /// VM name (used as the hostname when no --hostname is given)
    #[arg(long, short = 'n')]
    pub vm_name: Option<String>,

    /// Guest hostname; repeatable, the first one wins
    #[arg(long = "hostname", short = 'H', value_name = "HOSTNAME")]
    pub hostnames: Vec<String>,

    /// VM IP address; repeatable, the first one is registered
    #[arg(long = "ip", value_name = "ADDRESS")]
    pub ip_addresses: Vec<String>,

    /// JSON file describing the VM: {"name", "hostnames", "ipaddresses"}
    #[arg(long, short = 'f', value_name = "PATH")]
    pub vm_file: Option<PathBuf>,
}

// ── config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup wizard
    Init,

    /// Show the current configuration (passwords masked)
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Set a value on the active profile
    Set {
        /// Key: url, inventory, username, password_env, api_version, verify_ssl, timeout
        key: String,
        /// Value
        value: String,
    },

    /// Store a profile's password in the system keyring
    SetPassword {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
