//! Schema normalization

use types::{KeyConfig, NormalizedSchema, Schema, SchemaValue};

/// Resolve every declaration of `schema` to its canonical [`KeyConfig`]
pub fn normalize(schema: &Schema) -> NormalizedSchema {
    schema
        .iter()
        .map(|(name, value)| (name.to_string(), key_config(value)))
        .collect()
}

/// Canonical form of a single declaration.
///
/// A bare type is required. An explicit declaration is optional unless it says
/// otherwise, and always optional when it carries a default.
pub fn key_config(value: &SchemaValue) -> KeyConfig {
    match value {
        SchemaValue::Type(kind) => KeyConfig {
            kind: kind.clone(),
            optional: false,
            default: None,
        },
        SchemaValue::Spec(spec) => KeyConfig {
            kind: spec.kind.clone(),
            optional: spec.default.is_some() || spec.optional.unwrap_or(true),
            default: spec.default.clone(),
        },
    }
}
