// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use depmatrix::output::{EmitOutcome, ResultSink};
use depmatrix::{Error, Result, VersionIndex};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Package index served from memory.
#[derive(Default)]
pub struct StaticIndex {
    releases: HashMap<String, Vec<String>>,
}

impl StaticIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `versions` for `name`, in the given order.
    pub fn with(mut self, name: &str, versions: &[&str]) -> Self {
        self.releases.insert(
            name.to_string(),
            versions.iter().map(|v| v.to_string()).collect(),
        );
        self
    }
}

impl VersionIndex for StaticIndex {
    fn releases(&self, name: &str) -> Result<Vec<String>> {
        self.releases
            .get(name)
            .cloned()
            .ok_or_else(|| Error::IndexLookup {
                name: name.to_string(),
                reason: "HTTP 404 Not Found".to_string(),
            })
    }
}

/// Sink that keeps every emitted output in memory.
#[derive(Default)]
pub struct RecordingSink {
    pub outputs: Vec<(String, Vec<String>)>,
}

impl ResultSink for RecordingSink {
    fn emit(&mut self, key: &str, values: &[String]) -> Result<EmitOutcome> {
        self.outputs.push((key.to_string(), values.to_vec()));
        Ok(EmitOutcome::Written)
    }
}

/// Create a project directory containing only `pyproject.toml`.
///
/// Keep the TempDir alive to prevent cleanup.
pub fn pyproject_project(content: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "pyproject.toml", content);
    dir
}

/// Create a project directory containing only `setup.py`.
pub fn setup_py_project(content: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "setup.py", content);
    dir
}

pub fn write_file(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

/// Index matching the two-dependency example used across the tests:
/// `A` is required, `B` is an optional extra.
pub fn example_index() -> StaticIndex {
    StaticIndex::new()
        .with("A", &["0.9", "1.0", "1.1", "2.0", "3.0a1"])
        .with("B", &["0.5", "0.6", "1.0"])
}

pub const EXAMPLE_PYPROJECT: &str = r#"
[project]
name = "example"
version = "0.1.0"
dependencies = ["A>=1.0,<3"]

[project.optional-dependencies]
extra = ["B<1.0"]
"#;
