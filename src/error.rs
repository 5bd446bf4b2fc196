// src/error.rs

//! Error types shared by the manifest, resolver, index and output layers

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a matrix run
#[derive(Error, Debug)]
pub enum Error {
    /// Neither pyproject.toml nor setup.py exists at the project path
    #[error("No pyproject.toml or setup.py found in {}", .0.display())]
    ManifestNotFound(PathBuf),

    /// Manifest exists but a required field or pattern is missing
    #[error("Malformed manifest '{}': {reason}", path.display())]
    MalformedManifest { path: PathBuf, reason: String },

    /// Manifest uses a construct that cannot be read without evaluating it
    #[error("Unsupported manifest '{}': {reason}", path.display())]
    UnsupportedManifest { path: PathBuf, reason: String },

    #[error("Invalid requirement '{requirement}': {reason}")]
    InvalidRequirement { requirement: String, reason: String },

    #[error("Invalid version '{0}': {1}")]
    InvalidVersion(String, String),

    #[error("Invalid version specifier '{0}': {1}")]
    InvalidSpecifier(String, String),

    /// A constraint matched none of the published versions
    #[error("No compatible versions found for {0}")]
    NoCompatibleVersion(String),

    /// Network or index-service failure
    #[error("Index lookup failed for {name}: {reason}")]
    IndexLookup { name: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for depmatrix operations
pub type Result<T> = std::result::Result<T, Error>;
