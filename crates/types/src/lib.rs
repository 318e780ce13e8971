//! Shared types for envguard
//!
//! This crate contains the schema model, raw and typed values, the validation
//! report and the error types used across the envguard crates.

pub mod error;
pub mod report;
pub mod schema;
pub mod utils;
pub mod value;

// Re-export commonly used types
pub use error::{EnvError, Result, SchemaError};
pub use report::{ErrorKind, ValidationIssue, ValidationReport};
pub use schema::{KeyConfig, KeySpec, NormalizedSchema, Pattern, Schema, SchemaType, SchemaValue};
pub use value::{RawEnv, TypedEnv, Value};
