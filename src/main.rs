// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use depmatrix::{RawInputs, RunConfig};

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the case listing and completions
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => commands::cmd_completions(shell),
        None => {
            let config = RunConfig::from_inputs(&RawInputs::from(cli.inputs))?;
            commands::cmd_generate(&config)
        }
    }
}
