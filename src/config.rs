// src/config.rs

//! Run configuration
//!
//! Inputs arrive as optional strings (CLI flags or the `INPUT_*` variables a
//! GitHub Action receives, where unset inputs are empty strings). They are
//! validated once here and passed down as plain values; nothing below this
//! layer reads the process environment.

use crate::error::{Error, Result};
use crate::index::DEFAULT_INDEX_URL;
use crate::matrix::{MatrixConfig, Mode};
use std::path::{Path, PathBuf};

/// Unvalidated inputs, one per option
#[derive(Debug, Clone, Default)]
pub struct RawInputs {
    pub path: Option<String>,
    pub max_cases: Option<String>,
    pub mode: Option<String>,
    pub seed: Option<String>,
    pub index_url: Option<String>,
    pub output_file: Option<String>,
}

/// Validated configuration for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Project directory holding the manifest
    pub path: PathBuf,
    pub matrix: MatrixConfig,
    pub index_url: String,
    /// CI output file; `None` means results are only printed
    pub output_file: Option<PathBuf>,
}

/// Treat empty and whitespace-only inputs as unset
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl RunConfig {
    pub fn from_inputs(raw: &RawInputs) -> Result<Self> {
        let path = resolve_path(non_empty(raw.path.as_deref()).unwrap_or("."))?;

        let seed = non_empty(raw.seed.as_deref())
            .map(|s| {
                s.parse::<u64>().map_err(|e| {
                    Error::Config(format!("seed must be an unsigned integer, got '{}': {}", s, e))
                })
            })
            .transpose()?;

        let matrix = MatrixConfig {
            max_cases: parse_max_cases(raw.max_cases.as_deref())?,
            mode: non_empty(raw.mode.as_deref()).map_or(Mode::Full, Mode::from_input),
            seed,
        };

        Ok(Self {
            path,
            matrix,
            index_url: non_empty(raw.index_url.as_deref())
                .unwrap_or(DEFAULT_INDEX_URL)
                .to_string(),
            output_file: non_empty(raw.output_file.as_deref()).map(PathBuf::from),
        })
    }
}

/// Parse the case cap; empty or `0` means unbounded
pub fn parse_max_cases(value: Option<&str>) -> Result<Option<usize>> {
    let Some(value) = non_empty(value) else {
        return Ok(None);
    };
    let max = value.parse::<usize>().map_err(|e| {
        Error::Config(format!(
            "max cases must be a non-negative integer, got '{}': {}",
            value, e
        ))
    })?;
    Ok((max > 0).then_some(max))
}

/// Expand a leading `~` and make the path absolute
pub fn resolve_path(input: &str) -> Result<PathBuf> {
    let home = || {
        dirs::home_dir()
            .ok_or_else(|| Error::Config("cannot expand '~': no home directory".to_string()))
    };
    let expanded = match input.strip_prefix('~') {
        Some("") => home()?,
        Some(rest) if rest.starts_with('/') => home()?.join(rest.trim_start_matches('/')),
        _ => PathBuf::from(input),
    };
    Ok(std::path::absolute(Path::new(&expanded))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawInputs {
        RawInputs {
            path: Some("/srv/project".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = RunConfig::from_inputs(&raw()).unwrap();
        assert_eq!(config.path, PathBuf::from("/srv/project"));
        assert_eq!(config.matrix, MatrixConfig::default());
        assert_eq!(config.index_url, DEFAULT_INDEX_URL);
        assert!(config.output_file.is_none());
    }

    #[test]
    fn test_empty_inputs_are_unset() {
        let config = RunConfig::from_inputs(&RawInputs {
            path: Some("/srv/project".to_string()),
            max_cases: Some(String::new()),
            mode: Some(" ".to_string()),
            seed: Some(String::new()),
            index_url: Some(String::new()),
            output_file: Some(String::new()),
        })
        .unwrap();
        assert_eq!(config.matrix.max_cases, None);
        assert_eq!(config.matrix.mode, Mode::Full);
        assert_eq!(config.matrix.seed, None);
        assert_eq!(config.index_url, DEFAULT_INDEX_URL);
        assert!(config.output_file.is_none());
    }

    #[test]
    fn test_all_inputs() {
        let config = RunConfig::from_inputs(&RawInputs {
            path: Some("/srv/project".to_string()),
            max_cases: Some("12".to_string()),
            mode: Some("FIRST-LAST".to_string()),
            seed: Some("42".to_string()),
            index_url: Some("https://mirror.example.com/pypi".to_string()),
            output_file: Some("/tmp/out".to_string()),
        })
        .unwrap();
        assert_eq!(config.matrix.max_cases, Some(12));
        assert_eq!(config.matrix.mode, Mode::FirstLast);
        assert_eq!(config.matrix.seed, Some(42));
        assert_eq!(config.index_url, "https://mirror.example.com/pypi");
        assert_eq!(config.output_file, Some(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn test_parse_max_cases() {
        assert_eq!(parse_max_cases(None).unwrap(), None);
        assert_eq!(parse_max_cases(Some("0")).unwrap(), None);
        assert_eq!(parse_max_cases(Some(" 8 ")).unwrap(), Some(8));
        assert!(matches!(parse_max_cases(Some("-1")), Err(Error::Config(_))));
        assert!(matches!(parse_max_cases(Some("ten")), Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_seed() {
        let err = RunConfig::from_inputs(&RawInputs {
            seed: Some("abc".to_string()),
            ..raw()
        })
        .unwrap_err();
        assert!(err.to_string().contains("seed"));
    }

    #[test]
    fn test_resolve_path() {
        assert!(resolve_path(".").unwrap().is_absolute());
        assert_eq!(resolve_path("/a/b").unwrap(), PathBuf::from("/a/b"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(resolve_path("~/proj").unwrap(), home.join("proj"));
            assert_eq!(resolve_path("~").unwrap(), std::path::absolute(home).unwrap());
        }
    }
}
