//! Command handlers: bridge CLI args -> core reconciler / config -> output.

pub mod add_host;
pub mod config_cmd;
