//! Command line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Inspect, populate and clean up a Tower server
#[derive(Debug, Parser)]
#[command(name = "towerkit", version, about)]
pub struct Cli {
    /// YAML settings file; `credentials.yaml` is used when present
    #[arg(short = 'c', long = "config", env = "TOWERKIT_CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch an endpoint and print its JSON
    Get {
        /// e.g. /api/v1/job_templates/
        endpoint: String,
        /// Query parameters as key=value
        #[arg(value_parser = parse_key_value)]
        params: Vec<(String, String)>,
    },
    /// Create the resources described by a YAML manifest
    Load {
        manifest: PathBuf,
        /// Remove everything created once loading finishes
        #[arg(long)]
        teardown: bool,
    },
    /// Delete one resource, cancelling jobs that block the deletion
    Cleanup { endpoint: String },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", s)),
    }
}
