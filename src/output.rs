// src/output.rs

//! Result sink for the host CI system
//!
//! GitHub Actions reads step outputs from the file named by `GITHUB_OUTPUT`,
//! one `KEY=value` line per output. The case list is written there as a JSON
//! array so a later job can feed it to `fromJSON()` in a matrix strategy.

use crate::error::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

/// Output key the case list is published under
pub const CASES_OUTPUT_KEY: &str = "PYTHON_DEPENDENCY_CASES";

/// Whether an emitted value reached the output channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitOutcome {
    Written,
    /// No channel configured; the value was only logged
    Unavailable,
}

/// Destination for generated results
pub trait ResultSink {
    fn emit(&mut self, key: &str, values: &[String]) -> Result<EmitOutcome>;
}

/// Render one `KEY=<json>` output line, without the trailing newline
pub fn output_line(key: &str, values: &[String]) -> Result<String> {
    Ok(format!("{}={}", key, serde_json::to_string(values)?))
}

/// Appends outputs to a GitHub Actions output file
#[derive(Debug, Clone)]
pub struct GithubOutput {
    path: Option<PathBuf>,
}

impl GithubOutput {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl ResultSink for GithubOutput {
    fn emit(&mut self, key: &str, values: &[String]) -> Result<EmitOutcome> {
        let Some(ref path) = self.path else {
            warn!("GITHUB_OUTPUT not set, cannot set {}", key);
            return Ok(EmitOutcome::Unavailable);
        };

        let line = output_line(key, values)?;
        info!("Setting output for future use: {}", line);

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", line)?;
        Ok(EmitOutcome::Written)
    }
}
