use thiserror::Error;

/// Unified error type for sem-version operations
///
/// Every validation failure maps onto the same kind. The message names the
/// field (or constraint) and the offending value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemVersionError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience type alias for Results in sem-version
pub type Result<T> = std::result::Result<T, SemVersionError>;

impl SemVersionError {
    /// Create an invalid-argument error with context
    pub fn invalid(msg: impl Into<String>) -> Self {
        SemVersionError::InvalidArgument(msg.into())
    }

    /// Create an error for a field that rejected the given value
    pub fn field(field: &str, value: impl std::fmt::Display, reason: &str) -> Self {
        SemVersionError::InvalidArgument(format!("{} '{}' {}", field, value, reason))
    }

    /// Create an error for a constraint string that cannot be parsed
    pub fn constraint(text: &str, reason: &str) -> Self {
        SemVersionError::InvalidArgument(format!("constraint '{}' {}", text, reason))
    }
}
