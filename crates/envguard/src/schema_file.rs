//! YAML schema files
//!
//! ```yaml
//! variables:
//!   - name: PORT
//!     type: number
//!     default: 8080
//!   - name: MODE
//!     type: one_of
//!     values: [development, production]
//! ```

use crate::validation::BASE64;
use base64::Engine;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use types::{KeySpec, Schema, SchemaError, SchemaType, SchemaValue, Value};

/// Schema file contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Declared variables, in file order
    pub variables: Vec<VariableEntry>,
}

/// One declared variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableEntry {
    pub name: String,
    /// boolean, number, buffer, string, pattern or one_of
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    /// Buffer defaults are written as base64
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultLiteral>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

/// Default value as written in YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultLiteral {
    Boolean(bool),
    Number(i64),
    String(String),
}

impl SchemaFile {
    /// Load a schema file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SchemaError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        Figment::new()
            .merge(Yaml::file(path))
            .extract()
            .map_err(|e| SchemaError::ParseError(e.to_string()))
    }

    /// Parse schema YAML from a string
    pub fn load_from_str(yaml: &str) -> Result<Self, SchemaError> {
        Figment::new()
            .merge(Yaml::string(yaml))
            .extract()
            .map_err(|e| SchemaError::ParseError(e.to_string()))
    }

    /// Example schema covering every type
    pub fn example() -> Self {
        let entry = |name: &str, kind: &str| VariableEntry {
            name: name.to_string(),
            kind: kind.to_string(),
            optional: None,
            default: None,
            pattern: None,
            values: None,
        };

        Self {
            variables: vec![
                VariableEntry {
                    default: Some(DefaultLiteral::Number(8080)),
                    ..entry("PORT", "number")
                },
                VariableEntry {
                    default: Some(DefaultLiteral::Boolean(false)),
                    ..entry("DEBUG", "boolean")
                },
                entry("DATABASE_URL", "string"),
                VariableEntry {
                    values: Some(vec!["development".to_string(), "production".to_string()]),
                    ..entry("MODE", "one_of")
                },
                VariableEntry {
                    pattern: Some("[a-z]{2}-[a-z]+-[0-9]".to_string()),
                    optional: Some(true),
                    ..entry("REGION", "pattern")
                },
                VariableEntry {
                    optional: Some(true),
                    ..entry("SIGNING_KEY", "buffer")
                },
            ],
        }
    }

    /// Write this schema as YAML
    pub fn to_yaml(&self) -> Result<String, SchemaError> {
        serde_yaml::to_string(self).map_err(|e| SchemaError::ParseError(e.to_string()))
    }

    /// Convert to a [`Schema`], checking types, patterns and defaults
    pub fn into_schema(self) -> Result<Schema, SchemaError> {
        let mut schema = Schema::new();
        for entry in self.variables {
            let name = entry.name.clone();
            schema.insert(name, entry.into_schema_value()?);
        }
        Ok(schema)
    }
}

impl VariableEntry {
    fn into_schema_value(self) -> Result<SchemaValue, SchemaError> {
        let kind = self.schema_type()?;

        if self.optional.is_none() && self.default.is_none() {
            return Ok(SchemaValue::Type(kind));
        }

        let default = match self.default {
            Some(literal) => Some(default_value(&self.name, &kind, literal)?),
            None => None,
        };

        Ok(SchemaValue::Spec(KeySpec {
            kind,
            optional: self.optional,
            default,
        }))
    }

    fn schema_type(&self) -> Result<SchemaType, SchemaError> {
        match self.kind.as_str() {
            "boolean" => Ok(SchemaType::Boolean),
            "number" => Ok(SchemaType::Number),
            "buffer" => Ok(SchemaType::Buffer),
            "string" => Ok(SchemaType::String),
            "pattern" => {
                let source = self.pattern.as_deref().ok_or_else(|| SchemaError::MissingField {
                    key: self.name.clone(),
                    field: "pattern".to_string(),
                })?;
                SchemaType::pattern(source).map_err(|e| SchemaError::InvalidPattern {
                    key: self.name.clone(),
                    message: e.to_string(),
                })
            }
            "one_of" => match &self.values {
                Some(values) if !values.is_empty() => Ok(SchemaType::one_of(values.iter().cloned())),
                _ => Err(SchemaError::MissingField {
                    key: self.name.clone(),
                    field: "values".to_string(),
                }),
            },
            other => Err(SchemaError::UnknownType {
                key: self.name.clone(),
                name: other.to_string(),
            }),
        }
    }
}

fn default_value(key: &str, kind: &SchemaType, literal: DefaultLiteral) -> Result<Value, SchemaError> {
    let value = match (kind, literal) {
        (SchemaType::Buffer, DefaultLiteral::String(encoded)) => {
            let bytes = BASE64.decode(&encoded).map_err(|e| SchemaError::InvalidDefault {
                key: key.to_string(),
                message: e.to_string(),
            })?;
            Value::Buffer(bytes)
        }
        (_, DefaultLiteral::Boolean(value)) => Value::Boolean(value),
        (_, DefaultLiteral::Number(value)) => Value::Number(value),
        (_, DefaultLiteral::String(value)) => Value::String(value),
    };

    if !kind.admits(&value) {
        return Err(SchemaError::DefaultTypeMismatch {
            key: key.to_string(),
            expected: kind.name().to_string(),
            found: value.type_name().to_string(),
        });
    }
    Ok(value)
}
