//! Dot-separated identifier sequences used for prerelease and metadata sections
//!
//! Precedence between two prerelease sequences is decided identifier by
//! identifier. See https://semver.org/#spec-item-11

use crate::error::{Result, SemVersionError};
use crate::grammar;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A validated, non-empty, dot-separated list of `[A-Za-z0-9-]+` identifiers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifiers(String);

impl Identifiers {
    /// Parse an identifier sequence
    ///
    /// # Examples
    /// ```ignore
    /// let pre = Identifiers::parse("beta.1")?;
    /// assert_eq!(pre.iter().collect::<Vec<_>>(), vec!["beta", "1"]);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The individual identifiers, in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl FromStr for Identifiers {
    type Err = SemVersionError;

    fn from_str(s: &str) -> Result<Self> {
        if grammar::is_identifier_sequence(s) {
            Ok(Identifiers(s.to_string()))
        } else {
            Err(SemVersionError::invalid(format!(
                "'{}' is not a valid identifier sequence",
                s
            )))
        }
    }
}

impl fmt::Display for Identifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Numeric identifiers rank below non-numeric ones instead of comparing as
/// strings, which keeps the order transitive (`9 < 10a`, `9 < -x`).
impl Ord for Identifiers {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut lhs = self.iter();
        let mut rhs = other.iter();
        loop {
            match (lhs.next(), rhs.next()) {
                (Some(a), Some(b)) => match compare_identifier(a, b) {
                    Ordering::Equal => continue,
                    ord => return ord,
                },
                // A strict prefix has lower precedence
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (None, None) => return Ordering::Equal,
            }
        }
    }
}

impl PartialOrd for Identifiers {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn is_numeric(identifier: &str) -> bool {
    identifier.bytes().all(|b| b.is_ascii_digit())
}

/// Compare two single identifiers.
///
/// Numeric identifiers compare by value at any length, with the raw text as a
/// tie-breaker so that `01` and `1` stay distinct. Non-numeric identifiers
/// compare as ASCII. A numeric identifier ranks below a non-numeric one.
fn compare_identifier(a: &str, b: &str) -> Ordering {
    match (is_numeric(a), is_numeric(b)) {
        (true, true) => {
            let a_digits = a.trim_start_matches('0');
            let b_digits = b.trim_start_matches('0');
            a_digits
                .len()
                .cmp(&b_digits.len())
                .then_with(|| a_digits.cmp(b_digits))
                .then_with(|| a.cmp(b))
        }
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}
