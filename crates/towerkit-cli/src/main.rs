//! Main entry point for the towerkit command line tool.

use clap::Parser;
use towerkit_cli::{cli::Cli, commands, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;
    commands::run(cli).await
}
