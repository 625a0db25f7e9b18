//! Domain logic - the version value, its components and precedence rules

pub mod field;
pub mod prerelease;
pub mod version;

pub use field::Field;
pub use prerelease::Identifiers;
pub use version::{sem_version, SemVersion, VersionBump, VersionInput};
