//! Loosely-typed values accepted by the positional and keyed constructors
//! and by the field setters.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::prerelease::Identifiers;
use crate::error::{Result, SemVersionError};

/// A single loosely-typed version component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field {
    Int(i64),
    Text(String),
    Nil,
}

impl Field {
    /// Interpret as a numeric component (major, minor or patch).
    ///
    /// Accepts a non-negative integer or a string of ASCII digits, either of
    /// which must fit in a `u32`.
    pub fn to_number(&self, name: &str) -> Result<u32> {
        match self {
            Field::Int(n) => u32::try_from(*n).map_err(|_| {
                SemVersionError::field(name, n, "must be a non-negative integer")
            }),
            Field::Text(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => s
                .parse::<u32>()
                .map_err(|_| SemVersionError::field(name, s, "is out of range")),
            other => Err(SemVersionError::field(
                name,
                other,
                "must be a non-negative integer",
            )),
        }
    }

    /// Interpret as an optional identifier sequence (prerelease or metadata).
    ///
    /// `Nil` clears the section; text must match the identifier grammar.
    pub fn to_identifiers(&self, name: &str) -> Result<Option<Identifiers>> {
        let invalid = || SemVersionError::field(name, self, "is not a valid identifier sequence");
        match self {
            Field::Nil => Ok(None),
            Field::Text(s) => Identifiers::parse(s).map(Some).map_err(|_| invalid()),
            Field::Int(_) => Err(invalid()),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Int(n) => write!(f, "{}", n),
            Field::Text(s) => write!(f, "{}", s),
            Field::Nil => write!(f, "nil"),
        }
    }
}

impl From<i64> for Field {
    fn from(n: i64) -> Self {
        Field::Int(n)
    }
}

impl From<i32> for Field {
    fn from(n: i32) -> Self {
        Field::Int(i64::from(n))
    }
}

impl From<u32> for Field {
    fn from(n: u32) -> Self {
        Field::Int(i64::from(n))
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Field::Text(s.to_string())
    }
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        Field::Text(s)
    }
}

impl<T: Into<Field>> From<Option<T>> for Field {
    fn from(value: Option<T>) -> Self {
        value.map_or(Field::Nil, Into::into)
    }
}
