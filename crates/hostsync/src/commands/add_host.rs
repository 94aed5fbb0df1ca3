//! `add-host`: create or update a VM's host record in the target inventory.

use std::path::Path;

use owo_colors::OwoColorize;

use hostsync_core::{HostReconciler, Reconciled, Vm};

use crate::cli::{AddHostArgs, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output::{self, DetailRow};

pub async fn handle(args: &AddHostArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let tower = config::resolve_tower_config(global)?;
    let vm = build_vm(args)?;

    tracing::debug!(url = %tower.url, inventory = %tower.inventory_name, "resolved Tower profile");

    let reconciler = HostReconciler::new(tower)?;
    let done = reconciler.reconcile(vm.as_ref()).await?;

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &done,
        |d| detail(d, color),
        |d| d.hostname.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Assemble the VM descriptor from `--vm-file` and the inline flags.
///
/// Inline flags replace the corresponding file fields. With no VM input at
/// all the VM is reported as missing.
fn build_vm(args: &AddHostArgs) -> Result<Option<Vm>, CliError> {
    let mut vm = match args.vm_file {
        Some(ref path) => Some(load_vm_file(path)?),
        None => None,
    };

    if let Some(ref name) = args.vm_name {
        vm.get_or_insert_with(Vm::default).name.clone_from(name);
    }
    if !args.hostnames.is_empty() {
        vm.get_or_insert_with(Vm::default)
            .hostnames
            .clone_from(&args.hostnames);
    }
    if !args.ip_addresses.is_empty() {
        vm.get_or_insert_with(Vm::default)
            .ip_addresses
            .clone_from(&args.ip_addresses);
    }

    Ok(vm)
}

fn load_vm_file(path: &Path) -> Result<Vm, CliError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn detail(done: &Reconciled, color: bool) -> String {
    let status = format!(
        "✓ {} {} in inventory [ {} ]",
        done.hostname,
        done.action.past_tense(),
        done.inventory
    );
    let status = if color {
        status.green().to_string()
    } else {
        status
    };

    let rows = [
        DetailRow {
            field: "Hostname",
            value: done.hostname.clone(),
        },
        DetailRow {
            field: "IP address",
            value: done.ip.clone(),
        },
        DetailRow {
            field: "Inventory",
            value: format!("{} (id {})", done.inventory, done.inventory_id),
        },
        DetailRow {
            field: "Host id",
            value: done
                .host_id
                .as_ref()
                .map_or_else(|| "-".into(), ToString::to_string),
        },
        DetailRow {
            field: "Action",
            value: done.action.past_tense().into(),
        },
    ];

    format!("{status}\n{}", output::render_table(&rows))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::io::Write;

    use super::*;

    fn args() -> AddHostArgs {
        AddHostArgs {
            vm_name: None,
            hostnames: Vec::new(),
            ip_addresses: Vec::new(),
            vm_file: None,
        }
    }

    #[test]
    fn no_vm_input_means_missing_vm() {
        assert_eq!(build_vm(&args()).unwrap(), None);
    }

    #[test]
    fn inline_flags_build_vm() {
        let vm = build_vm(&AddHostArgs {
            vm_name: Some("web01".into()),
            ip_addresses: vec!["10.0.0.5".into()],
            ..args()
        })
        .unwrap()
        .unwrap();

        assert_eq!(vm.name, "web01");
        assert!(vm.hostnames.is_empty());
        assert_eq!(vm.ip_addresses, vec!["10.0.0.5".to_owned()]);
    }

    #[test]
    fn flags_replace_file_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"name": "vm-1234", "hostnames": ["old.lab"], "ipaddresses": ["10.0.0.9", "10.0.0.10"]}}"#
        )
        .unwrap();

        let vm = build_vm(&AddHostArgs {
            hostnames: vec!["web01.lab".into()],
            vm_file: Some(file.path().to_path_buf()),
            ..args()
        })
        .unwrap()
        .unwrap();

        assert_eq!(vm.name, "vm-1234");
        assert_eq!(vm.hostnames, vec!["web01.lab".to_owned()]);
        assert_eq!(vm.ip_addresses.len(), 2);
    }

    #[test]
    fn malformed_vm_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "name = 'web01'").unwrap();

        let result = build_vm(&AddHostArgs {
            vm_file: Some(file.path().to_path_buf()),
            ..args()
        });
        assert!(matches!(result, Err(CliError::VmFile(_))));
    }
}
