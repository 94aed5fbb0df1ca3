// ── Domain model ──
//
// Transient values built fresh for every reconciliation run.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

// ── VM descriptor ────────────────────────────────────────────────────

/// The virtual machine being registered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vm {
    pub name: String,
    /// Guest-reported hostnames, most authoritative first.
    #[serde(default)]
    pub hostnames: Vec<String>,
    #[serde(default, alias = "ipaddresses")]
    pub ip_addresses: Vec<String>,
}

// ── Host identity ────────────────────────────────────────────────────

/// The name and address a VM is registered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    pub hostname: String,
    pub ip: String,
}

impl HostIdentity {
    /// Pick the hostname and IP for `vm`.
    ///
    /// The first guest hostname wins, falling back to the VM name. Only the
    /// first IP address is used.
    pub fn derive(vm: Option<&Vm>) -> Result<Self, CoreError> {
        let vm = vm.ok_or(CoreError::VmNotFound)?;

        let hostname = vm.hostnames.first().unwrap_or(&vm.name);
        if hostname.trim().is_empty() {
            return Err(CoreError::HostnameUnresolved {
                vm: vm.name.clone(),
            });
        }

        let ip = vm
            .ip_addresses
            .first()
            .filter(|ip| !ip.trim().is_empty())
            .ok_or_else(|| CoreError::NoIpAddress {
                hostname: hostname.clone(),
            })?;

        Ok(Self {
            hostname: hostname.clone(),
            ip: ip.clone(),
        })
    }
}

// ── Tower identifiers ────────────────────────────────────────────────

/// An opaque Tower object id.
///
/// Tower hands out integers, but the id is echoed back in whatever JSON
/// shape it arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Int(u64),
    Str(String),
}

impl ResourceId {
    /// Read an id out of a JSON value. Blank strings and non-scalars yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().map(Self::Int),
            Value::String(s) if !s.trim().is_empty() => Some(Self::Str(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Str(id) => f.write_str(id),
        }
    }
}

/// An inventory name resolved to its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryRef {
    pub id: ResourceId,
    pub name: String,
}

// ── Host record payload ──────────────────────────────────────────────

/// Body of the create (`POST hosts`) and update (`PATCH hosts/{id}`) calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostPayload {
    pub name: String,
    pub inventory: ResourceId,
    pub enabled: bool,
    /// Host variables as a JSON-encoded string, the way Tower stores them.
    pub variables: String,
}

impl HostPayload {
    pub fn new(identity: &HostIdentity, inventory: &InventoryRef) -> Self {
        let variables = serde_json::json!({ "ansible_host": identity.ip }).to_string();
        Self {
            name: identity.hostname.clone(),
            inventory: inventory.id.clone(),
            enabled: true,
            variables,
        }
    }
}

// ── Outcome ──────────────────────────────────────────────────────────

/// Which write the run performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertAction {
    Created,
    Updated,
}

impl UpsertAction {
    pub fn past_tense(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
        }
    }
}

impl fmt::Display for UpsertAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Created => "create",
            Self::Updated => "update",
        })
    }
}

/// Confirmation record of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciled {
    pub hostname: String,
    pub ip: String,
    pub inventory: String,
    pub inventory_id: ResourceId,
    /// Known when the host pre-existed or Tower echoed the new record.
    pub host_id: Option<ResourceId>,
    pub action: UpsertAction,
}
