// src/index/mod.rs

//! Package index lookups
//!
//! The resolver only needs one question answered by an index: which version
//! identifiers have been published for a package? `VersionIndex` is that
//! seam; `PypiClient` answers it over the PyPI JSON API.

mod client;

pub use client::{DEFAULT_INDEX_URL, PypiClient, parse_releases};

use crate::error::Result;

/// A source of published versions
pub trait VersionIndex {
    /// Every published version identifier for `name`, in index order
    fn releases(&self, name: &str) -> Result<Vec<String>>;
}

impl<T: VersionIndex + ?Sized> VersionIndex for &T {
    fn releases(&self, name: &str) -> Result<Vec<String>> {
        (**self).releases(name)
    }
}
