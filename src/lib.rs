pub mod constraint;
pub mod domain;
pub mod error;
pub mod grammar;
pub mod interop;

pub use constraint::{is_open_constraint, split_constraint, Constraint, Operator};
pub use domain::{sem_version, Field, SemVersion, VersionBump, VersionInput};
pub use error::{Result, SemVersionError};
pub use grammar::is_valid;
