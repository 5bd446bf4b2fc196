// src/commands.rs
//! Command handlers for the depmatrix CLI

use crate::cli::Cli;
use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::Shell;
use depmatrix::output::{CASES_OUTPUT_KEY, GithubOutput, ResultSink};
use depmatrix::{PypiClient, RunConfig, dependency_cases};
use std::io;
use tracing::info;

/// Generate the test cases for a project and publish them
pub fn cmd_generate(config: &RunConfig) -> Result<()> {
    println!("Listing dependencies for {}", config.path.display());

    let client = PypiClient::with_index_url(&config.index_url)
        .context("Failed to create package index client")?;
    let report = dependency_cases(&config.path, &client, &config.matrix)
        .with_context(|| format!("Failed to generate cases for {}", config.path.display()))?;

    if report.cases.len() < report.natural_total {
        info!(
            "Sampled {} of {} cases",
            report.cases.len(),
            report.natural_total
        );
    }

    println!("Dependency cases:");
    for case in &report.cases {
        println!("  {}", case);
    }

    let mut sink = GithubOutput::new(config.output_file.clone());
    sink.emit(CASES_OUTPUT_KEY, &report.cases)
        .with_context(|| format!("Failed to write {} output", CASES_OUTPUT_KEY))?;

    Ok(())
}

/// Print a shell completion script to stdout
pub fn cmd_completions(shell: Shell) -> Result<()> {
    clap_complete::generate(shell, &mut Cli::command(), "depmatrix", &mut io::stdout());
    Ok(())
}
