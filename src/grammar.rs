//! Structural grammar for version strings
//!
//! `MAJOR.MINOR.PATCH[-PRERELEASE][+METADATA]`, where each numeric component
//! has no sign and no leading zeros, and each section is a dot-separated list
//! of `[A-Za-z0-9-]+` identifiers.
//!
//! The prerelease is the `-IDENT(.IDENT)*` run between the numeric triple and
//! the first `+`; the metadata is everything after that `+`. Hyphens are legal
//! identifier characters, so `1.0.0+a.b-c.0` is accepted as metadata `a.b-c.0`
//! with no prerelease.

use std::sync::LazyLock;

use regex::Regex;

const IDENTIFIERS: &str = r"[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*";

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)(?:-{IDENTIFIERS})?(?:\+{IDENTIFIERS})?$"
    ))
    .expect("version grammar is a valid regex")
});

static PRERELEASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^-({IDENTIFIERS})$"))
        .expect("prerelease grammar is a valid regex")
});

static METADATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\+({IDENTIFIERS})$")).expect("metadata grammar is a valid regex")
});

static IDENTIFIERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{IDENTIFIERS}$")).expect("identifier grammar is a valid regex")
});

/// The pieces of a well-formed version string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sections<'a> {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub prerelease: Option<&'a str>,
    pub metadata: Option<&'a str>,
}

impl<'a> Sections<'a> {
    /// Split `text` into its sections, or `None` if it is not a version string.
    ///
    /// Numeric components that do not fit in a `u32` are rejected here so that
    /// a `Some` result always converts into a version.
    pub fn scan(text: &'a str) -> Option<Self> {
        let captures = VERSION_RE.captures(text)?;
        let major = captures.get(1)?.as_str().parse::<u32>().ok()?;
        let minor = captures.get(2)?.as_str().parse::<u32>().ok()?;
        let patch_match = captures.get(3)?;
        let patch = patch_match.as_str().parse::<u32>().ok()?;

        let tail = &text[patch_match.end()..];
        // A `-` after the `+` belongs to the metadata
        let before_metadata = tail.split('+').next().unwrap_or_default();
        let prerelease = PRERELEASE_RE
            .captures(before_metadata)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str());
        let metadata = METADATA_RE
            .captures(tail)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str());

        Some(Sections {
            major,
            minor,
            patch,
            prerelease,
            metadata,
        })
    }
}

/// Whether `text` is a well-formed version string. Never fails.
pub fn is_valid(text: &str) -> bool {
    Sections::scan(text).is_some()
}

/// Whether `text` is a non-empty dot-separated list of `[A-Za-z0-9-]+` identifiers
pub fn is_identifier_sequence(text: &str) -> bool {
    IDENTIFIERS_RE.is_match(text)
}
