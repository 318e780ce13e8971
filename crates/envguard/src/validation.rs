//! Environment validation against a normalized schema

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use tracing::debug;
use types::{utils::sanitize_for_logging, NormalizedSchema, RawEnv, SchemaType, ValidationReport};

/// Standard alphabet; padding may be present or omitted but must be correct if present
pub(crate) const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Longest accepted digit run; keeps numbers within the 2^53 safe range
const MAX_NUMBER_DIGITS: usize = 15;

/// Raw environment that passed [`validate`], bound to the schema it was checked
/// against.
///
/// Only [`validate`] creates one, so coercion never sees unchecked input or a
/// different schema.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedEnv<'a> {
    schema: &'a NormalizedSchema,
    env: &'a RawEnv,
}

impl<'a> ValidatedEnv<'a> {
    /// The schema this environment was validated against
    pub fn schema(&self) -> &'a NormalizedSchema {
        self.schema
    }

    /// Raw value for `key`, treating the empty string as absent
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.env
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// The full mapping, including keys the schema does not declare
    pub fn as_raw(&self) -> &'a RawEnv {
        self.env
    }
}

/// Check every declared key of `schema` against `env`.
///
/// All failures are collected before returning. Keys that the schema does not
/// declare are ignored.
pub fn validate<'a>(
    schema: &'a NormalizedSchema,
    env: &'a RawEnv,
) -> Result<ValidatedEnv<'a>, ValidationReport> {
    let mut report = ValidationReport::new();

    for (key, config) in schema.iter() {
        match env.get(key).filter(|value| !value.is_empty()) {
            None if !config.optional => {
                debug!(key, "Missing required variable");
                report.add_missing(key, config);
            }
            None => {}
            Some(value) if !matches_type(&config.kind, value) => {
                debug!(
                    key,
                    expected = config.kind.name(),
                    value = %sanitize_for_logging(value),
                    "Variable has wrong type"
                );
                report.add_wrong_type(key, config, value);
            }
            Some(_) => {}
        }
    }

    if report.has_errors() {
        debug!(summary = %report.summary(), "Validation failed");
        return Err(report);
    }

    Ok(ValidatedEnv { schema, env })
}

/// Whether a non-empty raw value satisfies the grammar of `kind`
pub fn matches_type(kind: &SchemaType, value: &str) -> bool {
    match kind {
        SchemaType::Boolean => value == "true" || value == "false",
        SchemaType::Number => is_integer(value),
        SchemaType::Buffer => BASE64.decode(value).is_ok(),
        SchemaType::String => true,
        SchemaType::Pattern(pattern) => pattern.is_match(value),
        SchemaType::OneOf(values) => values.iter().any(|allowed| allowed == value),
    }
}

fn is_integer(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    (1..=MAX_NUMBER_DIGITS).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}
