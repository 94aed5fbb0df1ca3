// hostsync-api: Async Rust client for the Ansible Tower / AWX REST API

pub mod client;
pub mod error;
pub mod transport;

pub use client::{ApiResponse, JsonMap, TowerClient};
pub use error::Error;
pub use reqwest::Method;
pub use transport::TransportConfig;
