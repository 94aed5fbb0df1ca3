// ── Host reconciliation ──
//
// Ensures one VM is present, and correctly described, in one Tower
// inventory. The run is a fixed sequence of steps; the first failure ends it.
// A write that later fails verification is left in place.

use hostsync_api::{ApiResponse, TowerClient, TransportConfig};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::form_urlencoded;

use crate::config::TowerConfig;
use crate::error::CoreError;
use crate::model::{
    HostIdentity, HostPayload, InventoryRef, Reconciled, ResourceId, UpsertAction, Vm,
};

/// Runs the add-host workflow against a single Tower instance.
///
/// Concurrent runs for the same (VM, inventory) pair can race between the
/// lookup and the write; callers must serialize them.
pub struct HostReconciler {
    config: TowerConfig,
    client: TowerClient,
}

impl HostReconciler {
    /// Build a reconciler for `config`. Performs no network I/O.
    pub fn new(config: TowerConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            verify_tls: config.verify_ssl,
            timeout: config.timeout,
        };
        let client = TowerClient::new(
            &config.url,
            &config.api_version,
            &config.username,
            &config.password,
            &transport,
        )?;
        Ok(Self { config, client })
    }

    /// Create or update the host record for `vm`, then confirm Tower has it.
    ///
    /// `None` means the caller could not locate the VM at all.
    pub async fn reconcile(&self, vm: Option<&Vm>) -> Result<Reconciled, CoreError> {
        info!("Starting Ansible Tower REST API call to add a host to the inventory");

        self.config.validate()?;

        let inventory = self.resolve_inventory().await?;
        debug!(inventory_id = %inventory.id, "resolved inventory");

        let identity = HostIdentity::derive(vm)?;
        debug!(hostname = %identity.hostname, ip = %identity.ip, "derived host identity");

        let existing = self.lookup_host(&inventory, &identity).await?;
        let (action, host_id) = self.upsert_host(&inventory, &identity, existing).await?;

        self.verify_presence(&inventory, &identity).await?;

        info!(
            "VM {} with IP address {} successfully {} in Ansible Tower inventory [ {} ]",
            identity.hostname,
            identity.ip,
            action.past_tense(),
            inventory.name
        );

        Ok(Reconciled {
            hostname: identity.hostname,
            ip: identity.ip,
            inventory: inventory.name,
            inventory_id: inventory.id,
            host_id,
            action,
        })
    }

    // ── Steps ────────────────────────────────────────────────────────

    async fn resolve_inventory(&self) -> Result<InventoryRef, CoreError> {
        let name = &self.config.inventory_name;
        let resp = self
            .client
            .get(&format!("inventories?name={}", encode(name)))
            .await?;

        let results = resp.field("results").and_then(Value::as_array);
        if let Some(results) = results.filter(|r| r.len() > 1) {
            warn!(
                matches = results.len(),
                "inventory name '{name}' is ambiguous, using the first match"
            );
        }

        let id = results
            .and_then(|r| r.first())
            .and_then(|first| first.get("id"))
            .and_then(ResourceId::from_value)
            .ok_or_else(|| CoreError::InventoryNotFound { name: name.clone() })?;

        Ok(InventoryRef {
            id,
            name: name.clone(),
        })
    }

    /// Returns the id of the existing host record, if there is one.
    async fn lookup_host(
        &self,
        inventory: &InventoryRef,
        identity: &HostIdentity,
    ) -> Result<Option<ResourceId>, CoreError> {
        let path = format!(
            "inventories/{}/hosts/?name={}",
            inventory.id,
            encode(&identity.hostname)
        );
        let resp = self.client.get(&path).await?;

        let count = resp
            .field("count")
            .and_then(Value::as_u64)
            .ok_or_else(|| CoreError::UnexpectedResponse {
                context: "host lookup".into(),
                message: "response has no numeric `count`".into(),
            })?;

        if count == 0 {
            debug!("Host not yet present in Tower inventory");
            return Ok(None);
        }

        let host_id = first_result_id(&resp).ok_or_else(|| CoreError::UnexpectedResponse {
            context: "host lookup".into(),
            message: format!("count is {count} but no host id was returned"),
        })?;
        debug!(%host_id, "Host already present in Tower inventory");

        Ok(Some(host_id))
    }

    async fn upsert_host(
        &self,
        inventory: &InventoryRef,
        identity: &HostIdentity,
        existing: Option<ResourceId>,
    ) -> Result<(UpsertAction, Option<ResourceId>), CoreError> {
        let payload = HostPayload::new(identity, inventory);

        let (action, result) = match &existing {
            Some(host_id) => (
                UpsertAction::Updated,
                self.client.patch(&format!("hosts/{host_id}"), &payload).await,
            ),
            None => (
                UpsertAction::Created,
                self.client.post("hosts", &payload).await,
            ),
        };

        let resp = result.map_err(|err| match err {
            hostsync_api::Error::Api { status, body } => CoreError::UpsertFailed {
                hostname: identity.hostname.clone(),
                action,
                status,
                body,
            },
            other => other.into(),
        })?;

        let host_id = existing.or_else(|| resp.field("id").and_then(ResourceId::from_value));
        Ok((action, host_id))
    }

    async fn verify_presence(
        &self,
        inventory: &InventoryRef,
        identity: &HostIdentity,
    ) -> Result<(), CoreError> {
        let path = format!(
            "inventories/{}/hosts?name={}",
            inventory.id,
            encode(&identity.hostname)
        );
        let resp = self.client.get(&path).await?;

        match resp.field("count").and_then(Value::as_u64) {
            Some(count) if count > 0 => Ok(()),
            _ => Err(CoreError::VerificationFailed {
                hostname: identity.hostname.clone(),
                inventory: inventory.name.clone(),
            }),
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn first_result_id(resp: &ApiResponse) -> Option<ResourceId> {
    resp.field("results")
        .and_then(Value::as_array)
        .and_then(|results| results.first())
        .and_then(|first| first.get("id"))
        .and_then(ResourceId::from_value)
}
