//! Schema-driven environment loading
//!
//! This crate reads a `.env` file, merges it with the process environment,
//! validates every declared variable against its type and coerces the values
//! into a [`TypedEnv`]. All problems are reported together in one
//! [`ValidationReport`].
//!
//! ```no_run
//! use envguard::{load, KeySpec, LoadOptions, Schema, SchemaType};
//!
//! let schema = Schema::new()
//!     .key("PORT", KeySpec::new(SchemaType::Number).with_default(8080))
//!     .key("DATABASE_URL", SchemaType::String)
//!     .key("MODE", SchemaType::one_of(["development", "production"]));
//!
//! let env = load(&schema, LoadOptions::default())?;
//! let port = env.number("PORT");
//! # Ok::<(), envguard::EnvError>(())
//! ```

pub mod coerce;
pub mod loader;
pub mod normalize;
pub mod parser;
pub mod schema_file;
pub mod validation;

pub use coerce::coerce;
pub use loader::{
    load, merge, process_env, Encoding, EnvLoader, FileSource, FsSource, LoadOptions,
    UnsupportedEncoding,
};
pub use normalize::normalize;
pub use parser::parse;
pub use schema_file::SchemaFile;
pub use validation::{validate, ValidatedEnv};

pub use types::{
    EnvError, ErrorKind, KeyConfig, KeySpec, NormalizedSchema, Pattern, RawEnv, Schema,
    SchemaError, SchemaType, SchemaValue, TypedEnv, ValidationIssue, ValidationReport, Value,
};
