// src/manifest/mod.rs

//! Project manifest discovery
//!
//! Reads the declared dependencies of a Python project. Two manifest shapes
//! are recognized, checked in this order:
//! - `pyproject.toml` with `[project].dependencies` and
//!   `[project.optional-dependencies]`
//! - legacy `setup.py` with `install_requires=[...]` and
//!   `extras_require={...}` literals
//!
//! Dependencies declared in an optional group ("extra") are marked optional,
//! so the matrix can also test them being absent.

mod literal;
mod pyproject;
mod setup_py;

use crate::error::{Error, Result};
use crate::version::SpecifierSet;
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

pub use literal::{Literal, LiteralError, parse_literal};

/// Manifest file names, in preference order
pub const PYPROJECT_FILE: &str = "pyproject.toml";
pub const SETUP_PY_FILE: &str = "setup.py";

static REQUIREMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^\s*(?P<name>[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)",
        r"\s*(?:\[(?P<extras>[^\]]*)\])?",
        r"\s*(?P<spec>[^;]*?)",
        r"\s*(?:;\s*(?P<marker>.*?))?\s*$",
    ))
    .unwrap()
});

/// A declared dependency of the project
#[derive(Debug, Clone)]
pub struct Dependency {
    pub name: String,
    pub extras: Vec<String>,
    pub constraint: SpecifierSet,
    /// Environment marker, kept for display only
    pub marker: Option<String>,
    /// Optional group the dependency was declared in
    pub group: Option<String>,
}

impl Dependency {
    /// Parse a PEP 508 requirement string
    ///
    /// Examples:
    /// - "requests" → any version
    /// - "requests[socks]>=2.0,<3" → extras=[socks], constraint ">=2.0,<3"
    /// - "pydantic (>=2)" → parenthesized specifiers
    /// - "tomli>=1.1; python_version < '3.11'" → marker kept, not evaluated
    pub fn parse(requirement: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidRequirement {
            requirement: requirement.trim().to_string(),
            reason,
        };

        let caps = REQUIREMENT_RE
            .captures(requirement)
            .ok_or_else(|| invalid("expected a package name".to_string()))?;

        let mut spec = caps.name("spec").map_or("", |m| m.as_str()).trim();
        if spec.starts_with('@') {
            return Err(invalid("direct URL references are not supported".to_string()));
        }
        if let Some(inner) = spec.strip_prefix('(') {
            spec = inner
                .strip_suffix(')')
                .ok_or_else(|| invalid("unbalanced parenthesis".to_string()))?;
        }

        let constraint = SpecifierSet::parse(spec).map_err(|e| invalid(e.to_string()))?;

        let extras = caps
            .name("extras")
            .map(|m| {
                m.as_str()
                    .split(',')
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            name: caps["name"].to_string(),
            extras,
            constraint,
            marker: caps
                .name("marker")
                .map(|m| m.as_str().to_string())
                .filter(|m| !m.is_empty()),
            group: None,
        })
    }

    /// Mark the dependency as belonging to an optional group
    pub fn in_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    /// Whether the dependency may be omitted from a test case
    pub fn is_optional(&self) -> bool {
        self.group.is_some()
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.extras.is_empty() {
            write!(f, "[{}]", self.extras.join(","))?;
        }
        write!(f, "{}", self.constraint)?;
        if let Some(ref marker) = self.marker {
            write!(f, "; {}", marker)?;
        }
        Ok(())
    }
}

/// Read the dependencies declared by the project at `path`
///
/// Returns dependencies in declaration order: required first, then each
/// optional group in file order. A name declared twice keeps its first
/// position and takes the later declaration.
pub fn read_dependencies(path: &Path) -> Result<Vec<Dependency>> {
    let pyproject = path.join(PYPROJECT_FILE);
    let setup_py = path.join(SETUP_PY_FILE);

    let declared = if pyproject.exists() {
        debug!("Reading dependencies from {}", pyproject.display());
        pyproject::load(&pyproject)?
    } else if setup_py.exists() {
        debug!("Reading dependencies from {}", setup_py.display());
        setup_py::load(&setup_py)?
    } else {
        return Err(Error::ManifestNotFound(path.to_path_buf()));
    };

    Ok(merge_duplicates(declared))
}

fn merge_duplicates(declared: Vec<Dependency>) -> Vec<Dependency> {
    let mut deps: Vec<Dependency> = Vec::with_capacity(declared.len());
    for dep in declared {
        match deps.iter_mut().find(|d| d.name == dep.name) {
            Some(existing) => {
                warn!(
                    "{} is declared more than once, using '{}' over '{}'",
                    dep.name, dep, existing
                );
                *existing = dep;
            }
            None => deps.push(dep),
        }
    }
    deps
}
