// src/lib.rs

//! Depmatrix
//!
//! Builds CI test matrices for Python projects: every declared dependency is
//! exercised at each version its constraint allows, one dependency at a time,
//! against a baseline of lowest compatible versions.
//!
//! # Architecture
//!
//! - `manifest`: reads `pyproject.toml` or legacy `setup.py`
//! - `index`: fetches published versions from a PyPI-compatible JSON API
//! - `version`: PEP 440 versions and specifier sets
//! - `resolver`: filters published versions to compatible ones
//! - `matrix`: generates, samples and renders test cases
//! - `output`: publishes the case list to the CI output channel

pub mod config;
mod error;
pub mod index;
pub mod manifest;
pub mod matrix;
pub mod output;
pub mod pipeline;
pub mod resolver;
pub mod version;

pub use config::{RawInputs, RunConfig};
pub use error::{Error, Result};
pub use index::{PypiClient, VersionIndex};
pub use manifest::{Dependency, read_dependencies};
pub use matrix::{Matrix, MatrixConfig, Mode, TestCase};
pub use output::{CASES_OUTPUT_KEY, EmitOutcome, GithubOutput, ResultSink};
pub use pipeline::{CaseReport, dependency_cases};
pub use resolver::{CompatibleVersions, Resolver, VersionSlot};
pub use version::{PyVersion, Specifier, SpecifierSet};
