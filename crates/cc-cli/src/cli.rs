//! CLI argument parsing with clap

use cc_domain::{Application, Memory, Os, Version};
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use crate::output::Format;

/// ConoHa VPS client
#[derive(Parser, Debug)]
#[command(name = "conoha")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Table, global = true)]
    pub format: Format,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version,

    /// Contracted VMs
    #[command(subcommand)]
    Vm(VmCommands),

    /// Memory plans (flavors)
    #[command(subcommand)]
    Plan(PlanCommands),

    /// OS images
    #[command(subcommand)]
    Image(ImageCommands),

    /// Registered SSH keys
    #[command(subcommand)]
    Sshkey(SshkeyCommands),

    /// Orders, payments and invoices
    #[command(subcommand)]
    Billing(BillingCommands),
}

#[derive(Subcommand, Debug)]
pub enum VmCommands {
    /// List contracted VMs
    Ls,

    /// Add a VM
    Add(AddArgs),

    /// Boot a stopped VM
    Start(ActionArgs),

    /// Shut a running VM down
    Stop(ActionArgs),

    /// Reboot a VM
    Reboot(RebootArgs),

    /// Reinstall a VM from another image; the disk is wiped
    Rebuild(RebuildArgs),

    /// Move a VM onto another memory plan
    Resize(ResizeArgs),

    /// Save a VM's disk as a private image
    Snapshot(SnapshotArgs),

    /// Destroy a VM
    Rm(ActionArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// OS version; `latest` picks the newest one
    #[arg(short = 'r', long = "version", default_value = "latest")]
    pub os_version: Version,

    /// Bundled application as `name-version`; `null` for none
    #[arg(short, long, default_value = "null")]
    pub app: Application,

    /// Root password of the new VM
    #[arg(long, env = "OS_ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,

    /// SSH key pair to install
    #[arg(short, long, env = "OS_SSHKEY_NAME")]
    pub keypair_name: Option<String>,

    /// Block until the VM is ACTIVE
    #[arg(long)]
    pub wait: bool,

    /// Inspect the catalog instead of adding
    #[command(subcommand)]
    pub command: Option<AddCommands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddCommands {
    /// OS versions available for the memory plan and OS
    #[command(alias = "dist-vers")]
    Vers,

    /// Applications available for the memory plan, OS and version
    Apps,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct QueryArgs {
    /// Memory in GB (0.5, 1, 2, 4, 8, 16, 32, 64)
    #[arg(short, long)]
    pub memory: Memory,

    /// Operating system
    #[arg(short = 'd', long = "dist", default_value = "ubuntu")]
    pub os: Os,
}

#[derive(Args, Debug)]
pub struct ActionArgs {
    pub vm_id: Uuid,

    /// Block until the VM reaches the resulting status
    #[arg(long)]
    pub wait: bool,
}

#[derive(Args, Debug)]
pub struct RebootArgs {
    #[command(flatten)]
    pub action: ActionArgs,

    /// Hard reboot
    #[arg(long)]
    pub hard: bool,
}

#[derive(Args, Debug)]
pub struct RebuildArgs {
    pub vm_id: Uuid,

    #[command(flatten)]
    pub query: QueryArgs,

    /// OS version; `latest` picks the newest one
    #[arg(short = 'r', long = "version", default_value = "latest")]
    pub os_version: Version,

    /// Bundled application as `name-version`; `null` for none
    #[arg(short, long, default_value = "null")]
    pub app: Application,

    /// New root password; the current one is kept when unset
    #[arg(long, env = "OS_ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,

    /// SSH key pair to install
    #[arg(short, long, env = "OS_SSHKEY_NAME")]
    pub keypair_name: Option<String>,

    /// Block until the VM is ACTIVE again
    #[arg(long)]
    pub wait: bool,
}

#[derive(Args, Debug)]
pub struct ResizeArgs {
    pub vm_id: Uuid,

    /// Memory in GB of the new plan
    #[arg(short, long)]
    pub memory: Memory,

    /// Block until the VM is ACTIVE on the new plan
    #[arg(long)]
    pub wait: bool,
}

#[derive(Args, Debug)]
pub struct SnapshotArgs {
    pub vm_id: Uuid,

    /// Name of the saved image
    #[arg(short, long)]
    pub name: String,
}

#[derive(Subcommand, Debug)]
pub enum PlanCommands {
    /// List flavors with their memory plan
    Ls,
}

#[derive(Subcommand, Debug)]
pub enum ImageCommands {
    /// List OS images
    Ls(ImageLsArgs),

    /// Check every image belongs to exactly one OS
    Check,
}

#[derive(Args, Debug)]
pub struct ImageLsArgs {
    /// Only images of this OS
    #[arg(short = 'd', long = "dist")]
    pub os: Option<Os>,
}

#[derive(Subcommand, Debug)]
pub enum SshkeyCommands {
    /// List key pairs
    Ls,
}

#[derive(Subcommand, Debug)]
pub enum BillingCommands {
    /// Orders, or the detail of one
    Order { order_id: Option<Uuid> },

    /// Payment history
    Paid {
        /// Total deposit only
        #[arg(long)]
        summary: bool,
    },

    /// Invoices, or the detail of one
    Invoice {
        invoice_id: Option<i64>,

        #[arg(long)]
        offset: Option<u32>,

        #[arg(long)]
        limit: Option<u32>,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_vm_add_defaults() {
        let cli = Cli::try_parse_from(["conoha", "vm", "add", "-m", "0.5", "--admin-password", "pw"])
            .unwrap();
        let Commands::Vm(VmCommands::Add(args)) = cli.command else {
            panic!("expected vm add");
        };
        assert_eq!(args.query.memory, Memory::Mb512);
        assert_eq!(args.query.os, Os::Ubuntu);
        assert!(args.os_version.is_latest());
        assert!(args.app.is_none());
        assert_eq!(args.admin_password.as_deref(), Some("pw"));
        assert!(args.command.is_none());
    }

    #[test]
    fn test_vm_add_apps_subcommand() {
        let cli = Cli::try_parse_from([
            "conoha", "vm", "add", "-m", "2", "-d", "debian", "-r", "12.0", "apps",
        ])
        .unwrap();
        let Commands::Vm(VmCommands::Add(args)) = cli.command else {
            panic!("expected vm add");
        };
        assert_eq!(args.command, Some(AddCommands::Apps));
        assert_eq!(args.query.memory, Memory::Gb2);
        assert_eq!(args.query.os, Os::Debian);
        assert_eq!(args.os_version, Version::new("12.0"));
    }

    #[test]
    fn test_dist_vers_alias() {
        let cli = Cli::try_parse_from(["conoha", "vm", "add", "-m", "1", "dist-vers"]).unwrap();
        let Commands::Vm(VmCommands::Add(args)) = cli.command else {
            panic!("expected vm add");
        };
        assert_eq!(args.command, Some(AddCommands::Vers));
    }

    #[test]
    fn test_verbosity_and_format_are_global() {
        let cli = Cli::try_parse_from(["conoha", "vm", "ls", "-vv", "--format", "json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.format, Format::Json);
    }

    #[test]
    fn test_vm_rebuild_takes_query_after_id() {
        let id = Uuid::new_v4();
        let cli = Cli::try_parse_from([
            "conoha",
            "vm",
            "rebuild",
            &id.to_string(),
            "-m",
            "1",
            "-d",
            "centos",
            "-a",
            "cacti-nagios-1.2.17.4.4.6",
        ])
        .unwrap();
        let Commands::Vm(VmCommands::Rebuild(args)) = cli.command else {
            panic!("expected vm rebuild");
        };
        assert_eq!(args.vm_id, id);
        assert_eq!(args.query.os, Os::Centos);
        assert!(args.os_version.is_latest());
        assert_eq!(args.app, Application::new("cacti-nagios", "1.2.17.4.4.6"));
    }

    #[test]
    fn test_vm_resize_and_snapshot() {
        let id = Uuid::new_v4().to_string();
        let cli = Cli::try_parse_from(["conoha", "vm", "resize", &id, "-m", "4", "--wait"]).unwrap();
        let Commands::Vm(VmCommands::Resize(args)) = cli.command else {
            panic!("expected vm resize");
        };
        assert_eq!(args.memory, Memory::Gb4);
        assert!(args.wait);

        let cli = Cli::try_parse_from(["conoha", "vm", "snapshot", &id, "--name", "nightly"]).unwrap();
        let Commands::Vm(VmCommands::Snapshot(args)) = cli.command else {
            panic!("expected vm snapshot");
        };
        assert_eq!(args.name, "nightly");
        assert!(Cli::try_parse_from(["conoha", "vm", "snapshot", &id]).is_err());
    }

    #[test]
    fn test_unknown_memory_rejected() {
        assert!(Cli::try_parse_from(["conoha", "vm", "add", "-m", "3", "vers"]).is_err());
    }
}
