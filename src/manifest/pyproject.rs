// src/manifest/pyproject.rs

//! Reader for PEP 621 `pyproject.toml` metadata

use super::Dependency;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct PyProject {
    project: Option<Project>,
}

#[derive(Debug, Deserialize)]
struct Project {
    dependencies: Option<Vec<String>>,

    /// Group name -> requirement list, in file order
    #[serde(rename = "optional-dependencies", default)]
    optional_dependencies: Option<toml::Table>,
}

/// Load dependencies from a pyproject.toml file
pub(super) fn load(path: &Path) -> Result<Vec<Dependency>> {
    let content = fs::read_to_string(path)?;
    parse(path, &content)
}

fn parse(path: &Path, content: &str) -> Result<Vec<Dependency>> {
    let malformed = |reason: String| Error::MalformedManifest {
        path: path.to_path_buf(),
        reason,
    };

    let pyproject: PyProject = toml::from_str(content).map_err(|e| malformed(e.to_string()))?;
    let project = pyproject
        .project
        .ok_or_else(|| malformed("missing [project] table".to_string()))?;
    let required = project
        .dependencies
        .ok_or_else(|| malformed("missing project.dependencies".to_string()))?;

    let mut deps = required
        .iter()
        .map(|req| Dependency::parse(req))
        .collect::<Result<Vec<_>>>()?;

    for (group, requirements) in project.optional_dependencies.unwrap_or_default() {
        let requirements = requirements.as_array().ok_or_else(|| {
            malformed(format!(
                "project.optional-dependencies.{} must be a list",
                group
            ))
        })?;
        for req in requirements {
            let req = req.as_str().ok_or_else(|| {
                malformed(format!(
                    "project.optional-dependencies.{} must contain strings",
                    group
                ))
            })?;
            deps.push(Dependency::parse(req)?.in_group(&group));
        }
    }

    Ok(deps)
}
