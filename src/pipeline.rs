// src/pipeline.rs

//! End-to-end case generation: manifest → resolver → matrix

use crate::error::Result;
use crate::index::VersionIndex;
use crate::manifest::read_dependencies;
use crate::matrix::{self, MatrixConfig};
use crate::resolver::Resolver;
use std::path::Path;
use tracing::info;

/// Outcome of a generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    /// Rendered cases, baseline first
    pub cases: Vec<String>,
    /// Case count before sampling
    pub natural_total: usize,
}

/// Generate the test cases for the project at `path`
///
/// Any failure aborts before a case is produced.
pub fn dependency_cases<I: VersionIndex>(
    path: &Path,
    index: I,
    config: &MatrixConfig,
) -> Result<CaseReport> {
    let deps = read_dependencies(path)?;
    info!("Found {} dependencies in {}", deps.len(), path.display());

    let versions = Resolver::new(index).resolve(&deps)?;
    let matrix = matrix::generate(&versions, config);

    Ok(CaseReport {
        cases: matrix.render(),
        natural_total: matrix.natural_total(),
    })
}
