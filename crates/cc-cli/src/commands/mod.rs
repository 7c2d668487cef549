pub mod billing;
pub mod image;
pub mod plan;
pub mod sshkey;
pub mod version;
pub mod vm;

use cc_infra::ConohaProvider;

use crate::cli::{Cli, Commands};
use crate::error::Result;

pub async fn run(cli: Cli) -> Result<()> {
    let format = cli.format;
    match cli.command {
        Commands::Version => version::run(format),
        Commands::Vm(cmd) => vm::run(cmd, format).await,
        Commands::Plan(cmd) => plan::run(cmd, format).await,
        Commands::Image(cmd) => image::run(cmd, format).await,
        Commands::Sshkey(cmd) => sshkey::run(cmd, format).await,
        Commands::Billing(cmd) => billing::run(cmd, format).await,
    }
}

/// Token issued from the environment's credentials.
async fn connect() -> Result<ConohaProvider> {
    Ok(ConohaProvider::from_env().await?)
}
