// src/index/client.rs

//! HTTP client for the PyPI JSON API
//!
//! Issues one `GET {index}/{name}/json` per package and reads the keys of the
//! `releases` object. Requests are not retried: any transport error or
//! non-success status aborts the lookup.

use super::VersionIndex;
use crate::error::{Error, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

/// Public PyPI JSON API root
pub const DEFAULT_INDEX_URL: &str = "https://pypi.org/pypi";

const USER_AGENT: &str = concat!("depmatrix/", env!("CARGO_PKG_VERSION"));

/// Project document returned by the JSON API; only release keys are used
#[derive(Debug, Deserialize)]
struct ProjectDocument {
    releases: serde_json::Map<String, serde_json::Value>,
}

/// Extract release identifiers from a project document, in document order
pub fn parse_releases(body: &str) -> std::result::Result<Vec<String>, String> {
    let document: ProjectDocument =
        serde_json::from_str(body).map_err(|e| format!("Failed to parse index JSON: {e}"))?;
    Ok(document.releases.keys().cloned().collect())
}

/// PyPI JSON API client
pub struct PypiClient {
    client: Client,
    index_url: String,
}

impl PypiClient {
    /// Create a client for the public PyPI index
    pub fn new() -> Result<Self> {
        Self::with_index_url(DEFAULT_INDEX_URL)
    }

    /// Create a client for a PyPI-compatible JSON API rooted at `index_url`
    pub fn with_index_url(index_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            index_url: index_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn index_url(&self) -> &str {
        &self.index_url
    }

    /// URL of the JSON document for a project
    pub fn project_url(&self, name: &str) -> String {
        format!("{}/{}/json", self.index_url, name)
    }
}

impl VersionIndex for PypiClient {
    fn releases(&self, name: &str) -> Result<Vec<String>> {
        let url = self.project_url(name);
        let lookup_error = |reason: String| Error::IndexLookup {
            name: name.to_string(),
            reason,
        };

        debug!("Fetching release list from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| lookup_error(format!("Failed to fetch {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(lookup_error(format!("HTTP {} from {}", response.status(), url)));
        }

        let body = response
            .text()
            .map_err(|e| lookup_error(format!("Failed to read response: {e}")))?;

        let releases = parse_releases(&body).map_err(lookup_error)?;
        debug!("{} publishes {} releases", name, releases.len());
        Ok(releases)
    }
}
