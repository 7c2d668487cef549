use serde::Serialize;
use tabled::Tabled;

use super::connect;
use crate::cli::SshkeyCommands;
use crate::error::Result;
use crate::output::{self, Format};

#[derive(Debug, Tabled, Serialize)]
struct KeypairRow {
    name: String,
    fingerprint: String,
}

pub async fn run(cmd: SshkeyCommands, format: Format) -> Result<()> {
    match cmd {
        SshkeyCommands::Ls => {
            let provider = connect().await?;
            let rows: Vec<KeypairRow> = provider
                .client()
                .list_keypairs()
                .await?
                .into_iter()
                .map(|keypair| KeypairRow {
                    name: keypair.name,
                    fingerprint: keypair.fingerprint,
                })
                .collect();
            output::render(format, &rows)
        }
    }
}
