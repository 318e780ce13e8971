//! Validation report collecting every problem found in one pass

use crate::schema::{KeyConfig, SchemaType};
use std::fmt;

/// Why a key failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Required key absent or empty
    Missing,
    /// Key present but not of its declared type
    WrongType,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Missing => "MISSING",
            ErrorKind::WrongType => "WRONG_TYPE",
        }
    }
}

/// A single failed key
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub key: String,
    pub kind: ErrorKind,
    pub config: KeyConfig,
    pub received_value: Option<String>,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = &self.key;
        let value = self.received_value.as_deref().unwrap_or_default();
        match (self.kind, &self.config.kind) {
            (ErrorKind::Missing, _) => write!(f, "Expected value for key '{}'; none found", key),
            (ErrorKind::WrongType, kind @ SchemaType::Pattern(_)) => {
                write!(f, "Expected value for key '{}' to match {}; got '{}'", key, kind, value)
            }
            (ErrorKind::WrongType, kind @ SchemaType::OneOf(_)) => write!(
                f,
                "Expected value for key '{}' to be one of {}; got '{}'",
                key, kind, value
            ),
            (ErrorKind::WrongType, kind) => write!(
                f,
                "Expected value for key '{}' of type {}; got '{}'",
                key, kind, value
            ),
        }
    }
}

/// Validation report, one issue per failed key in schema order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add_missing(&mut self, key: &str, config: &KeyConfig) {
        self.errors.push(ValidationIssue {
            key: key.to_string(),
            kind: ErrorKind::Missing,
            config: config.clone(),
            received_value: None,
        });
    }

    pub fn add_wrong_type(&mut self, key: &str, config: &KeyConfig, received: &str) {
        self.errors.push(ValidationIssue {
            key: key.to_string(),
            kind: ErrorKind::WrongType,
            config: config.clone(),
            received_value: Some(received.to_string()),
        });
    }

    /// Issue recorded for `key`, if any
    pub fn get(&self, key: &str) -> Option<&ValidationIssue> {
        self.errors.iter().find(|issue| issue.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn summary(&self) -> String {
        let missing = self
            .errors
            .iter()
            .filter(|issue| issue.kind == ErrorKind::Missing)
            .count();
        format!(
            "Validation: {} missing, {} wrong type",
            missing,
            self.errors.len() - missing
        )
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Invalid or missing environment variables")?;
        for issue in &self.errors {
            writeln!(f, "    - {}", issue)?;
        }
        Ok(())
    }
}
