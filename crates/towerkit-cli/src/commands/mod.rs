//! Subcommand implementations

pub mod cleanup;
pub mod get;
pub mod load;

use anyhow::Context;
use towerkit_api::{TowerApi, TowerkitConfig};

use crate::cli::{Cli, Command};

/// Load settings, log in and dispatch to the chosen subcommand
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = TowerkitConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let api = TowerApi::new(config)
        .await
        .context("Failed to connect to the server")?;

    match cli.command {
        Command::Get { endpoint, params } => {
            let page = get::run(&api, &endpoint, &params).await?;
            println!("{}", page);
        }
        Command::Load { manifest, teardown } => {
            load::run(&api, &manifest, teardown).await?;
        }
        Command::Cleanup { endpoint } => cleanup::run(&api, &endpoint).await?,
    }
    Ok(())
}
