//! Error types for environment loading

use crate::report::ValidationReport;
use thiserror::Error;

/// Failure of a load call
#[derive(Error, Debug)]
pub enum EnvError {
    /// One or more declared keys are missing or badly typed
    #[error("{0}")]
    Validation(ValidationReport),
}

impl EnvError {
    /// The report behind the failure
    pub fn report(&self) -> &ValidationReport {
        match self {
            EnvError::Validation(report) => report,
        }
    }
}

impl From<ValidationReport> for EnvError {
    fn from(report: ValidationReport) -> Self {
        EnvError::Validation(report)
    }
}

/// Result type alias for load operations
pub type Result<T> = std::result::Result<T, EnvError>;

/// Schema file specific errors
#[derive(Error, Debug)]
pub enum SchemaError {
    /// File not found
    #[error("Schema file not found: {path}")]
    FileNotFound { path: String },

    /// Parse error
    #[error("Schema parse error: {0}")]
    ParseError(String),

    /// Unknown type name
    #[error("Unknown type '{name}' for key '{key}'")]
    UnknownType { key: String, name: String },

    /// Invalid regular expression
    #[error("Invalid pattern for key '{key}': {message}")]
    InvalidPattern { key: String, message: String },

    /// A pattern or one_of type without its pattern or values
    #[error("Missing {field} for key '{key}'")]
    MissingField { key: String, field: String },

    /// Default of the wrong runtime type
    #[error("Default for key '{key}' must be of type {expected}; got {found}")]
    DefaultTypeMismatch {
        key: String,
        expected: String,
        found: String,
    },

    /// Default that cannot be decoded
    #[error("Invalid default for key '{key}': {message}")]
    InvalidDefault { key: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_error_exposes_report() {
        let error = EnvError::from(ValidationReport::new());
        assert!(error.report().is_empty());
        assert_eq!(error.to_string(), "Invalid or missing environment variables\n");
    }
}
