// src/resolver/mod.rs

//! Compatible version resolution
//!
//! For every declared dependency this module asks the package index for all
//! published versions and keeps the ones the dependency's specifier set
//! accepts. Index order is preserved: the first compatible version is the
//! baseline, whatever the index considers oldest.
//!
//! Optional dependencies get a trailing [`VersionSlot::Omitted`] so the matrix
//! can exercise the project without them.

use crate::error::{Error, Result};
use crate::index::VersionIndex;
use crate::manifest::Dependency;
use crate::version::PyVersion;
use std::fmt;
use tracing::{debug, info};

/// One entry of a compatible version list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionSlot {
    /// A published version identifier
    Release(String),
    /// The dependency is left out of the case entirely
    Omitted,
}

impl VersionSlot {
    pub fn release(&self) -> Option<&str> {
        match self {
            VersionSlot::Release(v) => Some(v),
            VersionSlot::Omitted => None,
        }
    }

    pub fn is_omitted(&self) -> bool {
        matches!(self, VersionSlot::Omitted)
    }
}

impl From<&str> for VersionSlot {
    fn from(version: &str) -> Self {
        VersionSlot::Release(version.to_string())
    }
}

impl fmt::Display for VersionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSlot::Release(v) => write!(f, "{}", v),
            VersionSlot::Omitted => write!(f, "[omit]"),
        }
    }
}

/// A dependency and its ordered compatible versions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    pub name: String,
    /// Never empty; the first slot is always a release
    pub versions: Vec<VersionSlot>,
}

impl ResolvedDependency {
    /// The lowest compatible version, pinned in the baseline case
    pub fn baseline(&self) -> &VersionSlot {
        &self.versions[0]
    }
}

/// Compatible versions for every dependency, in manifest order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompatibleVersions {
    entries: Vec<ResolvedDependency>,
}

impl CompatibleVersions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the version list for `name`
    ///
    /// A replaced entry keeps its original position. Fails when the list has
    /// no leading release to serve as baseline.
    pub fn insert(&mut self, name: impl Into<String>, versions: Vec<VersionSlot>) -> Result<()> {
        let name = name.into();
        match versions.first() {
            Some(VersionSlot::Release(_)) => {}
            _ => return Err(Error::NoCompatibleVersion(name)),
        }

        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.versions = versions,
            None => self.entries.push(ResolvedDependency { name, versions }),
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedDependency> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedDependency> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a CompatibleVersions {
    type Item = &'a ResolvedDependency;
    type IntoIter = std::slice::Iter<'a, ResolvedDependency>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Filter published versions down to those `dep` accepts, keeping order
///
/// Identifiers that are not valid PEP 440 versions are never compatible.
pub fn compatible_releases(dep: &Dependency, published: &[String]) -> Vec<String> {
    published
        .iter()
        .filter(|raw| match PyVersion::parse(raw) {
            Ok(version) => dep.constraint.contains(&version),
            Err(e) => {
                debug!("Skipping {} {}: {}", dep.name, raw, e);
                false
            }
        })
        .cloned()
        .collect()
}

/// Resolves declared dependencies against a version index
pub struct Resolver<I> {
    index: I,
}

impl<I: VersionIndex> Resolver<I> {
    pub fn new(index: I) -> Self {
        Self { index }
    }

    /// Resolve compatible versions for every dependency, in order
    ///
    /// Lookups are sequential and the first failure aborts the run; no
    /// partial result is returned.
    pub fn resolve(&self, deps: &[Dependency]) -> Result<CompatibleVersions> {
        let mut resolved = CompatibleVersions::new();

        for dep in deps {
            let published = self.index.releases(&dep.name)?;
            let compatible = compatible_releases(dep, &published);

            if compatible.is_empty() {
                return Err(Error::NoCompatibleVersion(dep.name.clone()));
            }

            info!(
                "{}: {} of {} published versions satisfy '{}'",
                dep.name,
                compatible.len(),
                published.len(),
                dep.constraint
            );

            let mut versions: Vec<VersionSlot> =
                compatible.into_iter().map(VersionSlot::Release).collect();
            if dep.is_optional() {
                versions.push(VersionSlot::Omitted);
            }

            resolved.insert(dep.name.clone(), versions)?;
        }

        Ok(resolved)
    }
}
