//! Version range expressions for collection dependencies.
//!
//! A dependency value such as `>=1.0.0,<2.0.0` or `^1.2` is parsed into a
//! [`VersionRange`]. The grammar:
//!
//! - `*` matches every version.
//! - Clauses joined by `,` must all match; groups joined by `||` are
//!   alternatives.
//! - Operators: `==` (or `=`), `!=`, `<`, `<=`, `>`, `>=`, `^`, `~`, `~=`. A bare
//!   version means `==`.
//! - Versions may be partial (`1`, `1.2`); missing components are zero.
//!   With `==` (or bare), trailing `*`/`x` wildcards cover a whole series.
//!
//! # Examples
//!
//! ```
//! use galaxy_schema::version::VersionRange;
//!
//! let range = VersionRange::parse("^1.2").unwrap();
//! assert!(range.satisfies("1.9.0"));
//! assert!(!range.satisfies("2.0.0"));
//!
//! let range = VersionRange::parse(">=1.0.0,<1.5.0 || 2.0.0").unwrap();
//! assert!(range.satisfies("1.4.2"));
//! assert!(range.satisfies("2.0.0"));
//! assert!(!range.satisfies("1.5.0"));
//! ```

use std::fmt;
use std::str::FromStr;

use semver::Version;
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// A single version comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompareOp {
    /// `>=`
    Gte,
    /// `>`
    Gt,
    /// `<=`
    Lte,
    /// `<`
    Lt,
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

/// A single version specifier: an operator paired with a version.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Specifier {
    op: CompareOp,
    version: Version,
}

impl Specifier {
    fn new(op: CompareOp, version: Version) -> Self {
        Self { op, version }
    }

    fn matches(&self, candidate: &Version) -> bool {
        match self.op {
            CompareOp::Gte => candidate >= &self.version,
            CompareOp::Gt => candidate > &self.version,
            CompareOp::Lte => candidate <= &self.version,
            CompareOp::Lt => candidate < &self.version,
            CompareOp::Eq => candidate == &self.version,
            CompareOp::Ne => candidate != &self.version,
        }
    }
}

/// How many components of a version were written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Precision {
    Major,
    Minor,
    Patch,
}

/// A version as written in a clause, with missing components zero-filled.
#[derive(Debug, Clone)]
struct PartialVersion {
    version: Version,
    precision: Precision,
    wildcard: bool,
}

impl PartialVersion {
    // `None` when the bumped component would overflow u64.
    fn next_major(&self) -> Option<Version> {
        let major = self.version.major.checked_add(1)?;
        Some(Version::new(major, 0, 0))
    }

    fn next_minor(&self) -> Option<Version> {
        let minor = self.version.minor.checked_add(1)?;
        Some(Version::new(self.version.major, minor, 0))
    }

    fn next_patch(&self) -> Option<Version> {
        let patch = self.version.patch.checked_add(1)?;
        Some(Version::new(self.version.major, self.version.minor, patch))
    }
}

/// A parsed dependency version range.
///
/// Holds one or more alternatives; each alternative is a conjunction of
/// specifiers. An alternative with no specifiers matches everything.
#[derive(Debug, Clone)]
pub struct VersionRange {
    alternatives: Vec<Vec<Specifier>>,
    /// The original expression for display.
    raw: String,
}

impl VersionRange {
    /// Parse a range expression.
    pub fn parse(expression: &str) -> Result<Self> {
        let raw = expression.to_string();
        if expression.trim().is_empty() {
            return Err(invalid(&raw, "empty expression"));
        }

        let mut alternatives = Vec::new();
        for group in expression.split("||") {
            let mut specifiers = Vec::new();
            for clause in group.split(',').map(str::trim) {
                if clause.is_empty() {
                    return Err(invalid(&raw, "empty clause"));
                }
                if clause == "*" {
                    continue;
                }
                let parsed =
                    parse_clause(clause).map_err(|reason| invalid(&raw, &reason))?;
                specifiers.extend(parsed);
            }
            alternatives.push(specifiers);
        }

        Ok(Self { alternatives, raw })
    }

    /// Check whether `version` falls inside this range.
    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives
            .iter()
            .any(|specifiers| specifiers.iter().all(|spec| spec.matches(version)))
    }

    /// Check a version string. Returns `false` if it is not valid semver.
    pub fn satisfies(&self, version: &str) -> bool {
        match Version::parse(version.trim()) {
            Ok(parsed) => self.matches(&parsed),
            Err(_) => false,
        }
    }

    /// Whether the range accepts every version.
    pub fn is_any(&self) -> bool {
        self.alternatives.iter().any(Vec::is_empty)
    }

    /// Return the original expression.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl PartialEq for VersionRange {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for VersionRange {}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for VersionRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for VersionRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

fn invalid(expression: &str, reason: &str) -> Error {
    Error::InvalidVersionRange {
        expression: expression.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand a single clause like `>=1.2`, `^0.3.1` or `1.*` into specifiers.
fn parse_clause(clause: &str) -> std::result::Result<Vec<Specifier>, String> {
    enum Op {
        Compare(CompareOp),
        Caret,
        Tilde,
        Compatible,
    }

    let (op, version_str) = if let Some(rest) = clause.strip_prefix(">=") {
        (Op::Compare(CompareOp::Gte), rest)
    } else if let Some(rest) = clause.strip_prefix("<=") {
        (Op::Compare(CompareOp::Lte), rest)
    } else if let Some(rest) = clause.strip_prefix("!=") {
        (Op::Compare(CompareOp::Ne), rest)
    } else if let Some(rest) = clause.strip_prefix("==") {
        (Op::Compare(CompareOp::Eq), rest)
    } else if let Some(rest) = clause.strip_prefix('=') {
        (Op::Compare(CompareOp::Eq), rest)
    } else if let Some(rest) = clause.strip_prefix("~=") {
        (Op::Compatible, rest)
    } else if let Some(rest) = clause.strip_prefix('^') {
        (Op::Caret, rest)
    } else if let Some(rest) = clause.strip_prefix('~') {
        (Op::Tilde, rest)
    } else if let Some(rest) = clause.strip_prefix('>') {
        (Op::Compare(CompareOp::Gt), rest)
    } else if let Some(rest) = clause.strip_prefix('<') {
        (Op::Compare(CompareOp::Lt), rest)
    } else {
        // Bare version implies ==
        (Op::Compare(CompareOp::Eq), clause)
    };

    let version_str = version_str.trim();
    if version_str.is_empty() {
        return Err(format!("missing version in '{clause}'"));
    }
    let partial = parse_partial(version_str)?;

    if partial.wildcard && !matches!(op, Op::Compare(CompareOp::Eq)) {
        return Err(format!("wildcards are only allowed with '==' in '{clause}'"));
    }

    let lower = partial.version.clone();
    let upper = match op {
        Op::Compare(CompareOp::Eq) if partial.wildcard => match partial.precision {
            Precision::Major => partial.next_major(),
            Precision::Minor => partial.next_minor(),
            Precision::Patch => partial.next_patch(),
        },
        Op::Compare(op) => return Ok(vec![Specifier::new(op, lower)]),
        Op::Caret => {
            let v = &partial.version;
            if v.major > 0 || partial.precision == Precision::Major {
                partial.next_major()
            } else if v.minor > 0 || partial.precision == Precision::Minor {
                partial.next_minor()
            } else {
                partial.next_patch()
            }
        }
        Op::Tilde => match partial.precision {
            Precision::Major => partial.next_major(),
            Precision::Minor | Precision::Patch => partial.next_minor(),
        },
        Op::Compatible => match partial.precision {
            Precision::Major => {
                return Err(format!("'~=' needs at least major.minor in '{clause}'"));
            }
            Precision::Minor => partial.next_major(),
            Precision::Patch => partial.next_minor(),
        },
    };
    let upper = upper.ok_or_else(|| format!("upper bound overflows in '{clause}'"))?;

    let specifiers = vec![
        Specifier::new(CompareOp::Gte, lower),
        Specifier::new(CompareOp::Lt, upper),
    ];

    Ok(specifiers)
}

/// Parse a possibly partial version, zero-filling missing components.
///
/// - `"1.2.3-rc.1"` -> `1.2.3-rc.1`, full precision
/// - `"1.2"` -> `1.2.0`, minor precision
/// - `"1.*"` -> `1.0.0`, major precision, wildcard
fn parse_partial(s: &str) -> std::result::Result<PartialVersion, String> {
    if let Ok(version) = Version::parse(s) {
        return Ok(PartialVersion {
            version,
            precision: Precision::Patch,
            wildcard: false,
        });
    }

    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() > 3 {
        return Err(format!("invalid version: {s}"));
    }

    let mut numbers = Vec::with_capacity(parts.len());
    let mut wildcard = false;
    for part in &parts {
        if matches!(*part, "*" | "x" | "X") {
            wildcard = true;
            continue;
        }
        if wildcard {
            return Err(format!("invalid version: {s}"));
        }
        let number = part
            .parse::<u64>()
            .map_err(|_| format!("invalid version: {s}"))?;
        numbers.push(number);
    }

    let precision = match numbers.len() {
        1 => Precision::Major,
        2 => Precision::Minor,
        _ => return Err(format!("invalid version: {s}")),
    };

    let version = Version::new(
        numbers[0],
        numbers.get(1).copied().unwrap_or(0),
        numbers.get(2).copied().unwrap_or(0),
    );

    Ok(PartialVersion {
        version,
        precision,
        wildcard,
    })
}
