// src/version/mod.rs

//! Version handling and specifier matching for Python package requirements
//!
//! This module provides PEP 440 version parsing and comparison, and the
//! specifier sets found in requirement strings such as `requests>=2.0,<3`.
//! Membership is the only question the resolver asks: is a published version
//! inside the set a requirement declares?

use crate::error::{Error, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^\s*v?",
        r"(?:(?P<epoch>[0-9]+)!)?",
        r"(?P<release>[0-9]+(?:\.[0-9]+)*)",
        r"(?:[-_.]?(?P<pre_l>alpha|a|beta|b|preview|pre|c|rc)[-_.]?(?P<pre_n>[0-9]+)?)?",
        r"(?:-(?P<post_n1>[0-9]+)|[-_.]?(?P<post_l>post|rev|r)[-_.]?(?P<post_n2>[0-9]+)?)?",
        r"(?:[-_.]?(?P<dev_l>dev)[-_.]?(?P<dev_n>[0-9]+)?)?",
        r"(?:\+(?P<local>[a-z0-9]+(?:[-_.][a-z0-9]+)*))?",
        r"\s*$",
    ))
    .unwrap()
});

static SPECIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(~=|===|==|!=|<=|>=|<|>)\s*(\S+)\s*$").unwrap());

/// Pre-release phase, in ascending order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreRelease {
    Alpha,
    Beta,
    Rc,
}

impl PreRelease {
    fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "a" | "alpha" => PreRelease::Alpha,
            "b" | "beta" => PreRelease::Beta,
            // c, rc, pre, preview
            _ => PreRelease::Rc,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            PreRelease::Alpha => "a",
            PreRelease::Beta => "b",
            PreRelease::Rc => "rc",
        }
    }
}

/// One dot-separated piece of a local version label
///
/// Alphanumeric segments sort before numeric ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LocalSegment {
    Alpha(String),
    Numeric(u64),
}

impl fmt::Display for LocalSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalSegment::Alpha(s) => write!(f, "{}", s),
            LocalSegment::Numeric(n) => write!(f, "{}", n),
        }
    }
}

/// Sort key helper: a value bracketed by negative and positive infinity
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Bound<T> {
    NegInf,
    Val(T),
    PosInf,
}

/// A parsed PEP 440 version
#[derive(Debug, Clone)]
pub struct PyVersion {
    pub epoch: u64,
    pub release: Vec<u64>,
    pub pre: Option<(PreRelease, u64)>,
    pub post: Option<u64>,
    pub dev: Option<u64>,
    /// Local version label; empty when absent
    pub local: Vec<LocalSegment>,
}

impl PyVersion {
    /// Parse a version string
    ///
    /// Accepts the permissive spellings PEP 440 normalizes:
    /// - "1.0" → release=[1, 0]
    /// - "2!1.0" → epoch=2
    /// - "1.0alpha1", "1.0-a.1" → pre=(Alpha, 1)
    /// - "1.0-1", "1.0.rev1" → post=1
    /// - "1.0.dev" → dev=0
    /// - "1.0+ubuntu.1" → local=[ubuntu, 1]
    pub fn parse(s: &str) -> Result<Self> {
        let caps = VERSION_RE
            .captures(s)
            .ok_or_else(|| Error::InvalidVersion(s.to_string(), "not a PEP 440 version".into()))?;

        let number = |name: &str| -> Result<Option<u64>> {
            caps.name(name)
                .map(|m| {
                    m.as_str().parse::<u64>().map_err(|e| {
                        Error::InvalidVersion(s.to_string(), format!("{} component: {}", name, e))
                    })
                })
                .transpose()
        };

        let epoch = number("epoch")?.unwrap_or(0);

        let release = caps["release"]
            .split('.')
            .map(|part| {
                part.parse::<u64>().map_err(|e| {
                    Error::InvalidVersion(s.to_string(), format!("release segment: {}", e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let pre = match caps.name("pre_l") {
            Some(label) => Some((
                PreRelease::from_label(label.as_str()),
                number("pre_n")?.unwrap_or(0),
            )),
            None => None,
        };

        let post = if caps.name("post_n1").is_some() {
            number("post_n1")?
        } else if caps.name("post_l").is_some() {
            Some(number("post_n2")?.unwrap_or(0))
        } else {
            None
        };

        let dev = match caps.name("dev_l") {
            Some(_) => Some(number("dev_n")?.unwrap_or(0)),
            None => None,
        };

        let local = caps
            .name("local")
            .map(|m| {
                m.as_str()
                    .split(['-', '_', '.'])
                    .map(|seg| match seg.parse::<u64>() {
                        Ok(n) if seg.bytes().all(|b| b.is_ascii_digit()) => {
                            LocalSegment::Numeric(n)
                        }
                        _ => LocalSegment::Alpha(seg.to_ascii_lowercase()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            epoch,
            release,
            pre,
            post,
            dev,
            local,
        })
    }

    /// True for pre-releases and development releases
    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    pub fn is_postrelease(&self) -> bool {
        self.post.is_some()
    }

    pub fn has_local(&self) -> bool {
        !self.local.is_empty()
    }

    /// The version without its local label
    pub fn public(&self) -> PyVersion {
        PyVersion {
            local: Vec::new(),
            ..self.clone()
        }
    }

    /// Epoch and release only
    pub fn base(&self) -> PyVersion {
        PyVersion {
            epoch: self.epoch,
            release: self.release.clone(),
            pre: None,
            post: None,
            dev: None,
            local: Vec::new(),
        }
    }

    /// Check whether the release starts with `prefix`, padding with zeros
    fn has_release_prefix(&self, epoch: u64, prefix: &[u64]) -> bool {
        self.epoch == epoch
            && prefix
                .iter()
                .enumerate()
                .all(|(i, p)| self.release.get(i).copied().unwrap_or(0) == *p)
    }

    #[allow(clippy::type_complexity)]
    fn cmp_key(
        &self,
    ) -> (
        u64,
        &[u64],
        Bound<(PreRelease, u64)>,
        Bound<u64>,
        Bound<u64>,
        Bound<&[LocalSegment]>,
    ) {
        // Trailing zeros do not make a version different: 1.0 == 1.0.0
        let mut end = self.release.len();
        while end > 0 && self.release[end - 1] == 0 {
            end -= 1;
        }

        let pre = match (self.pre, self.post, self.dev) {
            // 1.0.dev0 sorts before 1.0a0
            (None, None, Some(_)) => Bound::NegInf,
            (None, _, _) => Bound::PosInf,
            (Some(p), _, _) => Bound::Val(p),
        };
        let post = self.post.map_or(Bound::NegInf, Bound::Val);
        let dev = self.dev.map_or(Bound::PosInf, Bound::Val);
        let local = if self.local.is_empty() {
            Bound::NegInf
        } else {
            Bound::Val(self.local.as_slice())
        };

        (self.epoch, &self.release[..end], pre, post, dev, local)
    }
}

impl fmt::Display for PyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch > 0 {
            write!(f, "{}!", self.epoch)?;
        }
        let release: Vec<String> = self.release.iter().map(u64::to_string).collect();
        write!(f, "{}", release.join("."))?;
        if let Some((phase, n)) = self.pre {
            write!(f, "{}{}", phase.as_str(), n)?;
        }
        if let Some(n) = self.post {
            write!(f, ".post{}", n)?;
        }
        if let Some(n) = self.dev {
            write!(f, ".dev{}", n)?;
        }
        if !self.local.is_empty() {
            let local: Vec<String> = self.local.iter().map(LocalSegment::to_string).collect();
            write!(f, "+{}", local.join("."))?;
        }
        Ok(())
    }
}

impl PartialEq for PyVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PyVersion {}

impl Ord for PyVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_key().cmp(&other.cmp_key())
    }
}

impl PartialOrd for PyVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Specifier comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `~=`
    Compatible,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<=`
    LessOrEqual,
    /// `>=`
    GreaterOrEqual,
    /// `<`
    LessThan,
    /// `>`
    GreaterThan,
    /// `===`, string identity
    Arbitrary,
}

impl Operator {
    fn parse(op: &str) -> Option<Self> {
        Some(match op {
            "~=" => Operator::Compatible,
            "==" => Operator::Equal,
            "!=" => Operator::NotEqual,
            "<=" => Operator::LessOrEqual,
            ">=" => Operator::GreaterOrEqual,
            "<" => Operator::LessThan,
            ">" => Operator::GreaterThan,
            "===" => Operator::Arbitrary,
            _ => return None,
        })
    }

    fn as_str(self) -> &'static str {
        match self {
            Operator::Compatible => "~=",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::LessOrEqual => "<=",
            Operator::GreaterOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::GreaterThan => ">",
            Operator::Arbitrary => "===",
        }
    }
}

/// A single version specifier such as `>=1.2` or `==2.*`
#[derive(Debug, Clone)]
pub struct Specifier {
    pub operator: Operator,
    /// Version text as written, without any `.*` suffix
    pub version: String,
    /// `==X.*` / `!=X.*` prefix match
    pub wildcard: bool,
    parsed: Option<PyVersion>,
}

impl Specifier {
    /// Parse a single specifier
    ///
    /// Examples:
    /// - ">= 1.2.3" → GreaterOrEqual(1.2.3)
    /// - "~=2.2" → Compatible(2.2), i.e. ">= 2.2, == 2.*"
    /// - "==1.4.*" → Equal(1.4) with prefix matching
    /// - "===foobar" → Arbitrary("foobar")
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidSpecifier(s.trim().to_string(), reason.into());

        let caps = SPECIFIER_RE
            .captures(s)
            .ok_or_else(|| invalid("expected an operator followed by a version"))?;
        let operator = Operator::parse(&caps[1]).ok_or_else(|| invalid("unknown operator"))?;
        let text = &caps[2];

        if operator == Operator::Arbitrary {
            return Ok(Self {
                operator,
                version: text.to_string(),
                wildcard: false,
                parsed: PyVersion::parse(text).ok(),
            });
        }

        let (text, wildcard) = match text.strip_suffix(".*") {
            Some(prefix) => (prefix, true),
            None => (text, false),
        };

        if wildcard && !matches!(operator, Operator::Equal | Operator::NotEqual) {
            return Err(invalid("'.*' is only allowed with == and !="));
        }

        let version = PyVersion::parse(text).map_err(|e| invalid(&e.to_string()))?;

        if wildcard
            && (version.pre.is_some()
                || version.post.is_some()
                || version.dev.is_some()
                || version.has_local())
        {
            return Err(invalid("wildcard prefixes may only contain release segments"));
        }

        if version.has_local() && !matches!(operator, Operator::Equal | Operator::NotEqual) {
            return Err(invalid("local versions are only allowed with == and !="));
        }

        if operator == Operator::Compatible && version.release.len() < 2 {
            return Err(invalid("~= requires at least two release segments"));
        }

        Ok(Self {
            operator,
            version: text.to_string(),
            wildcard,
            parsed: Some(version),
        })
    }

    /// Whether this specifier opts its set into accepting pre-releases
    pub fn allows_prereleases(&self) -> bool {
        matches!(
            self.operator,
            Operator::Compatible
                | Operator::Equal
                | Operator::LessOrEqual
                | Operator::GreaterOrEqual
                | Operator::Arbitrary
        ) && self.parsed.as_ref().is_some_and(PyVersion::is_prerelease)
    }

    /// Check if a version satisfies this specifier, ignoring pre-release policy
    pub fn contains(&self, version: &PyVersion) -> bool {
        let spec = match (&self.parsed, self.operator) {
            (_, Operator::Arbitrary) => {
                return version.to_string().eq_ignore_ascii_case(&self.version);
            }
            (Some(spec), _) => spec,
            // Only === may carry an unparsable version
            (None, _) => return false,
        };

        match self.operator {
            Operator::Compatible => {
                let prefix = &spec.release[..spec.release.len() - 1];
                version.public() >= *spec && version.has_release_prefix(spec.epoch, prefix)
            }
            Operator::Equal => self.matches_equal(version, spec),
            Operator::NotEqual => !self.matches_equal(version, spec),
            Operator::LessOrEqual => version.public() <= *spec,
            Operator::GreaterOrEqual => version.public() >= *spec,
            Operator::LessThan => {
                // <3.0 must not admit 3.0rc1
                version < spec
                    && !(!spec.is_prerelease()
                        && version.is_prerelease()
                        && version.base() == spec.base())
            }
            Operator::GreaterThan => {
                // >3.0 must not admit 3.0.post1 or 3.0+local
                version > spec
                    && !(!spec.is_postrelease()
                        && version.is_postrelease()
                        && version.base() == spec.base())
                    && !(version.has_local() && version.base() == spec.base())
            }
            Operator::Arbitrary => unreachable!("handled above"),
        }
    }

    fn matches_equal(&self, version: &PyVersion, spec: &PyVersion) -> bool {
        if self.wildcard {
            version.has_release_prefix(spec.epoch, &spec.release)
        } else if spec.has_local() {
            version == spec
        } else {
            version.public() == *spec
        }
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator.as_str(), self.version)?;
        if self.wildcard {
            write!(f, ".*")?;
        }
        Ok(())
    }
}

/// A comma-separated conjunction of specifiers
#[derive(Debug, Clone, Default)]
pub struct SpecifierSet {
    specifiers: Vec<Specifier>,
}

impl SpecifierSet {
    /// Parse a specifier set
    ///
    /// An empty string is the unconstrained set.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::default());
        }

        // Empty segments (`>=1.0,`) are ignored
        let specifiers = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(Specifier::parse)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { specifiers })
    }

    pub fn is_empty(&self) -> bool {
        self.specifiers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Specifier> {
        self.specifiers.iter()
    }

    /// Check if a version is a member of this set
    ///
    /// Pre-releases are only members when one of the specifiers names a
    /// pre-release itself.
    pub fn contains(&self, version: &PyVersion) -> bool {
        let prereleases = self.specifiers.iter().any(Specifier::allows_prereleases);
        if !prereleases && version.is_prerelease() {
            return false;
        }
        self.specifiers.iter().all(|spec| spec.contains(version))
    }
}

impl fmt::Display for SpecifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.specifiers.iter().map(Specifier::to_string).collect();
        write!(f, "{}", parts.join(","))
    }
}
