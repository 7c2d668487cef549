//! `conoha vm`: list, add, change and drive the lifecycle of VMs.

use cc_domain::{Vm, VmStatus};
use cc_infra::add::AddVm;
use cc_infra::change::{RebuildVm, ResizeVm};
use cc_infra::query::DistQuery;
use cc_infra::types::VpsId;
use cc_infra::watch::Watcher;
use cc_infra::{ConohaProvider, VpsProvider};
use serde::Serialize;
use tabled::Tabled;
use tracing::info;

use super::connect;
use crate::cli::{ActionArgs, AddArgs, AddCommands, RebuildArgs, ResizeArgs, VmCommands};
use crate::error::{CliError, Result};
use crate::output::{self, Format};

#[derive(Debug, Tabled, Serialize)]
struct VmRow {
    name: String,
    ipv4: String,
    #[tabled(rename = "vm id")]
    vm_id: String,
    status: String,
    created: String,
    updated: String,
}

impl From<&Vm> for VmRow {
    fn from(vm: &Vm) -> Self {
        Self {
            name: vm.name.clone(),
            ipv4: vm
                .ipv4()
                .map_or_else(|_| "-".to_string(), |addr| addr.to_string()),
            vm_id: vm.vm_id.to_string(),
            status: vm.status.to_string(),
            created: output::timestamp(&vm.created),
            updated: output::timestamp(&vm.updated),
        }
    }
}

#[derive(Debug, Tabled, Serialize)]
struct VersionRow {
    version: String,
}

#[derive(Debug, Tabled, Serialize)]
struct AppRow {
    app: String,
}

pub async fn run(cmd: VmCommands, format: Format) -> Result<()> {
    let provider = connect().await?;
    match cmd {
        VmCommands::Ls => {
            let vms = provider.list_vps().await?;
            let rows: Vec<VmRow> = vms.iter().map(VmRow::from).collect();
            output::render(format, &rows)
        }
        VmCommands::Add(args) => add(&provider, args, format).await,
        VmCommands::Start(args) => {
            let id = VpsId(args.vm_id);
            provider.start_vps(&id).await?;
            finish(&provider, &id, &args, VmStatus::Active, format).await
        }
        VmCommands::Stop(args) => {
            let id = VpsId(args.vm_id);
            provider.stop_vps(&id).await?;
            finish(&provider, &id, &args, VmStatus::Shutoff, format).await
        }
        VmCommands::Reboot(args) => {
            let id = VpsId(args.action.vm_id);
            provider.reboot_vps(&id, args.hard).await?;
            finish(&provider, &id, &args.action, VmStatus::Active, format).await
        }
        VmCommands::Rebuild(args) => rebuild(&provider, args, format).await,
        VmCommands::Resize(args) => resize(&provider, args, format).await,
        VmCommands::Snapshot(args) => {
            let id = VpsId(args.vm_id);
            provider.snapshot_vps(&id, &args.name).await?;
            info!(server_id = %id, image_name = %args.name, "snapshot requested");
            Ok(())
        }
        VmCommands::Rm(args) => remove(&provider, &args).await,
    }
}

async fn add(provider: &ConohaProvider, args: AddArgs, format: Format) -> Result<()> {
    let query = DistQuery::new(args.query.memory, args.query.os);
    let catalog = provider.catalog().await?;

    match args.command {
        Some(AddCommands::Vers) => {
            let rows: Vec<VersionRow> = query
                .available_versions(&catalog)?
                .into_iter()
                .map(|version| VersionRow {
                    version: version.to_string(),
                })
                .collect();
            output::render(format, &rows)
        }
        Some(AddCommands::Apps) => {
            let rows: Vec<AppRow> = query
                .apps(&catalog, &args.os_version)?
                .into_iter()
                .map(|app| AppRow {
                    app: app.to_string(),
                })
                .collect();
            output::render(format, &rows)
        }
        None => {
            let admin_pass = args.admin_password.ok_or(CliError::MissingAdminPassword)?;
            let request = AddVm {
                query,
                version: args.os_version,
                app: args.app,
                admin_pass,
                key_name: args.keypair_name,
            };
            let id = request.run(provider, &catalog).await?;
            if args.wait {
                Watcher::new(VmStatus::Active).wait(provider, &id).await?;
            }
            show(provider, &id, format).await
        }
    }
}

async fn rebuild(provider: &ConohaProvider, args: RebuildArgs, format: Format) -> Result<()> {
    let id = VpsId(args.vm_id);
    let catalog = provider.catalog().await?;
    let request = RebuildVm {
        query: DistQuery::new(args.query.memory, args.query.os),
        version: args.os_version,
        app: args.app,
        admin_pass: args.admin_password,
        key_name: args.keypair_name,
    };
    request.run(provider, &catalog, &id).await?;
    if args.wait {
        Watcher::new(VmStatus::Active).wait(provider, &id).await?;
    }
    show(provider, &id, format).await
}

/// Resizes are always confirmed; `--wait` also waits for the VM to be ACTIVE.
async fn resize(provider: &ConohaProvider, args: ResizeArgs, format: Format) -> Result<()> {
    let id = VpsId(args.vm_id);
    let catalog = provider.catalog().await?;
    ResizeVm::new(args.memory).run(provider, &catalog, &id).await?;
    if args.wait {
        Watcher::new(VmStatus::Active).wait(provider, &id).await?;
    }
    show(provider, &id, format).await
}

/// Optionally wait for `expected`, then print the VM.
async fn finish(
    provider: &ConohaProvider,
    id: &VpsId,
    args: &ActionArgs,
    expected: VmStatus,
    format: Format,
) -> Result<()> {
    if args.wait {
        Watcher::new(expected).wait(provider, id).await?;
    }
    show(provider, id, format).await
}

async fn show(provider: &ConohaProvider, id: &VpsId, format: Format) -> Result<()> {
    let vm = provider.get_vps(id).await?;
    output::render(format, &[VmRow::from(&vm)])
}

/// With `--wait` a running VM is shut down first and deleted once it is
/// SHUTOFF.
async fn remove(provider: &ConohaProvider, args: &ActionArgs) -> Result<()> {
    let id = VpsId(args.vm_id);
    if args.wait {
        let vm = provider.get_vps(&id).await?;
        if !vm.status.is_shutoff() {
            provider.stop_vps(&id).await?;
            Watcher::new(VmStatus::Shutoff).wait(provider, &id).await?;
        }
    }
    provider.destroy_vps(&id).await?;
    info!(server_id = %id, "VM removed");
    Ok(())
}
