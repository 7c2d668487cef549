use cc_domain::Memory;
use conoha_api::Flavor;
use serde::Serialize;
use tabled::Tabled;

use super::connect;
use crate::cli::PlanCommands;
use crate::error::Result;
use crate::output::{self, Format};

#[derive(Debug, Tabled, Serialize)]
struct PlanRow {
    name: String,
    #[tabled(rename = "memory (GB)")]
    memory: String,
    vcpus: u32,
    #[tabled(rename = "disk (GB)")]
    disk: u64,
    #[tabled(rename = "flavor id")]
    flavor_id: String,
}

impl From<&Flavor> for PlanRow {
    fn from(flavor: &Flavor) -> Self {
        let memory = Memory::ALL
            .into_iter()
            .find(|memory| memory.is_flavor(&flavor.name))
            .map_or_else(|| "-".to_string(), |memory| memory.to_string());
        Self {
            name: flavor.name.clone(),
            memory,
            vcpus: flavor.vcpus,
            disk: flavor.disk,
            flavor_id: flavor.id.to_string(),
        }
    }
}

pub async fn run(cmd: PlanCommands, format: Format) -> Result<()> {
    match cmd {
        PlanCommands::Ls => {
            let provider = connect().await?;
            let flavors = provider.client().list_flavors().await?;
            let rows: Vec<PlanRow> = flavors.iter().map(PlanRow::from).collect();
            output::render(format, &rows)
        }
    }
}
