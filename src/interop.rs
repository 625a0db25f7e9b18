//! Conversions to and from `semver::Version`
//!
//! The `semver` crate is stricter about prerelease identifiers (no leading
//! zeros in numeric identifiers) and wider about numeric components (`u64`),
//! so both directions are fallible.

use crate::domain::{Identifiers, SemVersion};
use crate::error::{Result, SemVersionError};

impl TryFrom<&semver::Version> for SemVersion {
    type Error = SemVersionError;

    fn try_from(version: &semver::Version) -> Result<Self> {
        let component = |name: &str, n: u64| {
            u32::try_from(n).map_err(|_| SemVersionError::field(name, n, "is out of range"))
        };
        let section = |s: &str| (!s.is_empty()).then(|| Identifiers::parse(s)).transpose();

        Ok(SemVersion::from_triple(
            component("major", version.major)?,
            component("minor", version.minor)?,
            component("patch", version.patch)?,
        )
        .with_sections(section(version.pre.as_str())?, section(version.build.as_str())?))
    }
}

impl TryFrom<semver::Version> for SemVersion {
    type Error = SemVersionError;

    fn try_from(version: semver::Version) -> Result<Self> {
        SemVersion::try_from(&version)
    }
}

impl TryFrom<&SemVersion> for semver::Version {
    type Error = SemVersionError;

    fn try_from(version: &SemVersion) -> Result<Self> {
        let rejected = |field: &str, value: &str, err: semver::Error| {
            SemVersionError::field(field, value, &format!("is rejected by semver: {}", err))
        };
        let pre = match version.pre() {
            Some(pre) => semver::Prerelease::new(pre).map_err(|e| rejected("prerelease", pre, e))?,
            None => semver::Prerelease::EMPTY,
        };
        let build = match version.metadata() {
            Some(meta) => {
                semver::BuildMetadata::new(meta).map_err(|e| rejected("metadata", meta, e))?
            }
            None => semver::BuildMetadata::EMPTY,
        };

        Ok(semver::Version {
            major: u64::from(version.major()),
            minor: u64::from(version.minor()),
            patch: u64::from(version.patch()),
            pre,
            build,
        })
    }
}
