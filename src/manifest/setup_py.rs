// src/manifest/setup_py.rs

//! Reader for legacy `setup.py` projects
//!
//! Locates the `install_requires=` and `extras_require=` keyword arguments and
//! reads the literal that follows each one.

use super::Dependency;
use super::literal::{Literal, LiteralError, parse_literal};
use crate::error::{Error, Result};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static INSTALL_REQUIRES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\binstall_requires\s*=\s*").unwrap());
static EXTRAS_REQUIRE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bextras_require\s*=\s*").unwrap());

/// Load dependencies from a setup.py file
pub(super) fn load(path: &Path) -> Result<Vec<Dependency>> {
    let content = fs::read_to_string(path)?;
    parse(path, &content)
}

fn parse(path: &Path, content: &str) -> Result<Vec<Dependency>> {
    let unsupported = |keyword: &str, reason: String| Error::UnsupportedManifest {
        path: path.to_path_buf(),
        reason: format!("{} is not a literal: {}", keyword, reason),
    };

    let required = keyword_literal(&INSTALL_REQUIRES_RE, content)
        .ok_or_else(|| Error::MalformedManifest {
            path: path.to_path_buf(),
            reason: "could not find `install_requires`".to_string(),
        })?
        .map_err(|e| unsupported("install_requires", e.to_string()))?;

    let mut deps = requirement_list(&required)
        .map_err(|reason| unsupported("install_requires", reason))?
        .into_iter()
        .map(Dependency::parse)
        .collect::<Result<Vec<_>>>()?;

    if let Some(extras) = keyword_literal(&EXTRAS_REQUIRE_RE, content) {
        let extras = extras.map_err(|e| unsupported("extras_require", e.to_string()))?;
        let groups = match extras {
            Literal::Dict(groups) => groups,
            other => {
                return Err(unsupported(
                    "extras_require",
                    format!("expected a dict, found a {}", other.kind()),
                ));
            }
        };
        for (group, requirements) in &groups {
            let Literal::Str(group) = group else {
                return Err(unsupported(
                    "extras_require",
                    "group names must be strings".to_string(),
                ));
            };
            for req in requirement_list(requirements)
                .map_err(|reason| unsupported("extras_require", reason))?
            {
                deps.push(Dependency::parse(req)?.in_group(group));
            }
        }
    }

    Ok(deps)
}

/// Read the literal following a keyword assignment
///
/// The keyword may also appear in comments or docstrings, so every
/// occurrence is tried and the first one holding a literal wins. `None` when
/// the keyword never appears; otherwise the first parse error.
fn keyword_literal(
    keyword: &Regex,
    content: &str,
) -> Option<std::result::Result<Literal, LiteralError>> {
    let mut first_error = None;
    for found in keyword.find_iter(content) {
        match parse_literal(&content[found.end()..]) {
            Ok((value, _)) => return Some(Ok(value)),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }
    first_error.map(Err)
}

/// Borrow the strings of a list literal
fn requirement_list(value: &Literal) -> std::result::Result<Vec<&str>, String> {
    match value {
        Literal::List(items) => items
            .iter()
            .map(|item| match item {
                Literal::Str(s) => Ok(s.as_str()),
                other => Err(format!("expected strings, found a {}", other.kind())),
            })
            .collect(),
        // A lone string is accepted by setuptools as a one-line list
        Literal::Str(s) => Ok(s.lines().map(str::trim).filter(|l| !l.is_empty()).collect()),
        other => Err(format!("expected a list, found a {}", other.kind())),
    }
}
