//! Version constraints such as `>= 1.2`, `= 1.2.3` or `~> 2.2`
//!
//! A constraint is `[OPERATOR] FRAGMENT`. The operator defaults to `=` and
//! `==` is an alias for it. The fragment is `X`, `X.Y` or a full version;
//! missing components are treated as `0`.

use crate::domain::version::SemVersion;
use crate::error::{Result, SemVersionError};
use crate::grammar;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static CONSTRAINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(~>|==|>=|<=|=|>|<)?\s*(\S+)\s*$")
        .expect("constraint grammar is a valid regex")
});

static PARTIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0|[1-9][0-9]*)(?:\.(0|[1-9][0-9]*))?$")
        .expect("partial version grammar is a valid regex")
});

/// Comparison operator of a constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=` or `==`
    Equal,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    /// `~>`
    Pessimistic,
}

impl Operator {
    /// Whether the operator admits a range of versions rather than a single one
    pub fn is_open(&self) -> bool {
        !matches!(self, Operator::Equal)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::Greater => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::Less => "<",
            Operator::LessOrEqual => "<=",
            Operator::Pessimistic => "~>",
        }
    }
}

impl FromStr for Operator {
    type Err = SemVersionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" | "=" | "==" => Ok(Operator::Equal),
            ">" => Ok(Operator::Greater),
            ">=" => Ok(Operator::GreaterOrEqual),
            "<" => Ok(Operator::Less),
            "<=" => Ok(Operator::LessOrEqual),
            "~>" => Ok(Operator::Pessimistic),
            other => Err(SemVersionError::field(
                "operator",
                other,
                "is not one of =, ==, >, >=, <, <=, ~>",
            )),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    operator: Operator,
    fragment: String,
    target: SemVersion,
    /// Number of numeric components written in the fragment (1 to 3)
    arity: usize,
}

impl Constraint {
    /// Parse a constraint string
    ///
    /// # Example
    /// ```ignore
    /// let c = Constraint::parse("~> 2.2")?;
    /// assert!(c.matches(&SemVersion::parse("2.9.0")?));
    /// assert!(!c.matches(&SemVersion::parse("3.0.0")?));
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let captures = CONSTRAINT_RE
            .captures(text)
            .ok_or_else(|| SemVersionError::constraint(text, "is not [OPERATOR] VERSION"))?;
        let operator: Operator = captures.get(1).map_or("", |m| m.as_str()).parse()?;
        let fragment = captures
            .get(2)
            .map(|m| m.as_str())
            .ok_or_else(|| SemVersionError::constraint(text, "has no version"))?;
        let (target, arity) = target_from_fragment(fragment)
            .ok_or_else(|| SemVersionError::constraint(text, "has an invalid version fragment"))?;

        Ok(Constraint {
            operator,
            fragment: fragment.to_string(),
            target,
            arity,
        })
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The version text as written, without the operator
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// The fragment padded to a full version
    pub fn target(&self) -> &SemVersion {
        &self.target
    }

    pub fn is_open(&self) -> bool {
        self.operator.is_open()
    }

    /// Whether `version` satisfies this constraint
    pub fn matches(&self, version: &SemVersion) -> bool {
        let target = &self.target;
        let satisfied = match self.operator {
            Operator::Equal => version == target,
            Operator::Greater => version > target,
            Operator::GreaterOrEqual => version >= target,
            Operator::Less => version < target,
            Operator::LessOrEqual => version <= target,
            // X and X.Y: stay within the major. X.Y.Z: stay within the minor.
            Operator::Pessimistic => {
                let same_series = if self.arity < 3 {
                    version.major() == target.major()
                } else {
                    version.major() == target.major() && version.minor() == target.minor()
                };
                same_series && version >= target
            }
        };
        tracing::trace!(%version, constraint = %self, satisfied, "evaluated constraint");
        satisfied
    }
}

/// Build the comparison target for a fragment and count its numeric components
fn target_from_fragment(fragment: &str) -> Option<(SemVersion, usize)> {
    if grammar::is_valid(fragment) {
        return SemVersion::parse(fragment).ok().map(|target| (target, 3));
    }

    let captures = PARTIAL_RE.captures(fragment)?;
    let major = captures.get(1)?.as_str().parse::<u32>().ok()?;
    let (minor, arity) = match captures.get(2) {
        Some(m) => (m.as_str().parse::<u32>().ok()?, 2),
        None => (0, 1),
    };
    Some((SemVersion::from_triple(major, minor, 0), arity))
}

impl FromStr for Constraint {
    type Err = SemVersionError;

    fn from_str(s: &str) -> Result<Self> {
        Constraint::parse(s)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operator, self.fragment)
    }
}

/// Split a constraint into its normalized operator and version fragment
///
/// A bare fragment and `==` both normalize to `=`.
pub fn split_constraint(text: &str) -> Result<(Operator, String)> {
    let constraint = Constraint::parse(text)?;
    Ok((constraint.operator, constraint.fragment))
}

/// Whether a constraint admits a range of versions. Malformed input is not open.
pub fn is_open_constraint(text: &str) -> bool {
    Constraint::parse(text).is_ok_and(|c| c.is_open())
}
