//! Schema declaration types
//!
//! A [`Schema`] is what callers write: an ordered list of variable names, each
//! declared either as a bare [`SchemaType`] or as an explicit [`KeySpec`]. A
//! [`NormalizedSchema`] is the canonical form the pipeline works with, one
//! [`KeyConfig`] per variable.

use crate::value::Value;
use regex::Regex;
use std::fmt;

/// A regular expression that must match the whole value
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern. The value has to match from its first to its last character.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = match Regex::new(&format!("^(?:{})$", source)) {
            Ok(regex) => regex,
            Err(anchored) => {
                // A trailing `(?x)` comment swallows the closing group; a newline ends it.
                Regex::new(source)?;
                Regex::new(&format!("^(?:{}\n)$", source)).map_err(|_| anchored)?
            }
        };
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// The pattern as written by the caller
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.source)
    }
}

/// The type a variable is declared with
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaType {
    /// Exactly `true` or `false`
    Boolean,
    /// Signed integer of at most 15 digits
    Number,
    /// Base64-encoded bytes
    Buffer,
    /// Any non-empty string
    String,
    /// String matching a regular expression
    Pattern(Pattern),
    /// One of a fixed set of strings
    OneOf(Vec<String>),
}

impl SchemaType {
    /// Build a pattern type from regex source
    pub fn pattern(source: &str) -> Result<Self, regex::Error> {
        Pattern::new(source).map(SchemaType::Pattern)
    }

    /// Build an enumerated type from the allowed values
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SchemaType::OneOf(values.into_iter().map(Into::into).collect())
    }

    /// Name used in error messages and logs
    pub fn name(&self) -> &'static str {
        match self {
            SchemaType::Boolean => "Boolean",
            SchemaType::Number => "Number",
            SchemaType::Buffer => "Buffer",
            SchemaType::String => "String",
            SchemaType::Pattern(_) => "Pattern",
            SchemaType::OneOf(_) => "OneOf",
        }
    }

    /// Whether `value` has the runtime type values of this type coerce to
    pub fn admits(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (SchemaType::Boolean, Value::Boolean(_))
                | (SchemaType::Number, Value::Number(_))
                | (SchemaType::Buffer, Value::Buffer(_))
                | (
                    SchemaType::String | SchemaType::Pattern(_) | SchemaType::OneOf(_),
                    Value::String(_)
                )
        )
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaType::Pattern(pattern) => write!(f, "{}", pattern),
            SchemaType::OneOf(values) => {
                let quoted: Vec<String> = values.iter().map(|v| format!("'{}'", v)).collect();
                write!(f, "{}", quoted.join(" | "))
            }
            other => f.write_str(other.name()),
        }
    }
}

/// Explicit per-key declaration
#[derive(Debug, Clone, PartialEq)]
pub struct KeySpec {
    pub kind: SchemaType,
    pub optional: Option<bool>,
    pub default: Option<Value>,
}

impl KeySpec {
    pub fn new(kind: SchemaType) -> Self {
        Self {
            kind,
            optional: None,
            default: None,
        }
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = Some(optional);
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// One entry of a schema declaration: shorthand or explicit
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaValue {
    /// Bare type, required
    Type(SchemaType),
    /// Explicit declaration with optionality and default
    Spec(KeySpec),
}

impl From<SchemaType> for SchemaValue {
    fn from(kind: SchemaType) -> Self {
        SchemaValue::Type(kind)
    }
}

impl From<KeySpec> for SchemaValue {
    fn from(spec: KeySpec) -> Self {
        SchemaValue::Spec(spec)
    }
}

impl From<KeyConfig> for SchemaValue {
    fn from(config: KeyConfig) -> Self {
        SchemaValue::Spec(KeySpec {
            kind: config.kind,
            optional: Some(config.optional),
            default: config.default,
        })
    }
}

/// Canonical per-key configuration
#[derive(Debug, Clone, PartialEq)]
pub struct KeyConfig {
    pub kind: SchemaType,
    pub optional: bool,
    pub default: Option<Value>,
}

/// Ordered schema declaration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    entries: Vec<(String, SchemaValue)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Schema::insert`]
    pub fn key(mut self, name: impl Into<String>, value: impl Into<SchemaValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Declare a key. Redeclaring a key replaces it in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<SchemaValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&SchemaValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Schema
where
    K: Into<String>,
    V: Into<SchemaValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for (name, value) in iter {
            schema.insert(name, value);
        }
        schema
    }
}

/// Schema with every entry resolved to a [`KeyConfig`], in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedSchema {
    entries: Vec<(String, KeyConfig)>,
}

impl NormalizedSchema {
    pub fn get(&self, name: &str) -> Option<&KeyConfig> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, config)| config)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeyConfig)> {
        self.entries.iter().map(|(name, config)| (name.as_str(), config))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, KeyConfig)> for NormalizedSchema {
    fn from_iter<I: IntoIterator<Item = (String, KeyConfig)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_matches_whole_value() {
        let pattern = Pattern::new("abc").unwrap();
        assert!(pattern.is_match("abc"));
        assert!(!pattern.is_match("xabc"));
        assert!(!pattern.is_match("abcx"));

        let alternation = Pattern::new("a|b").unwrap();
        assert!(alternation.is_match("a"));
        assert!(!alternation.is_match("ab"));
    }

    #[test]
    fn test_pattern_with_trailing_verbose_comment() {
        let pattern = Pattern::new("(?x)abc # trailing comment").unwrap();
        assert!(pattern.is_match("abc"));
        assert!(!pattern.is_match("abcd"));
        assert!(!pattern.is_match("abc\n"));
        assert_eq!(pattern.as_str(), "(?x)abc # trailing comment");

        assert!(Pattern::new("(abc").is_err());
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(SchemaType::pattern("(unclosed").is_err());
    }

    #[test]
    fn test_type_display() {
        assert_eq!(SchemaType::Number.to_string(), "Number");
        assert_eq!(SchemaType::pattern("^abc$").unwrap().to_string(), "/^abc$/");
        assert_eq!(SchemaType::one_of(["a", "b"]).to_string(), "'a' | 'b'");
    }

    #[test]
    fn test_admits() {
        assert!(SchemaType::Boolean.admits(&Value::Boolean(true)));
        assert!(SchemaType::one_of(["x"]).admits(&Value::from("x")));
        assert!(!SchemaType::Number.admits(&Value::from("10")));
        assert!(!SchemaType::String.admits(&Value::Buffer(vec![1])));
    }

    #[test]
    fn test_redeclared_key_replaces_in_place() {
        let schema = Schema::new()
            .key("A", SchemaType::Boolean)
            .key("B", SchemaType::Number)
            .key("A", SchemaType::String);

        let names: Vec<&str> = schema.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(schema.get("A"), Some(&SchemaValue::Type(SchemaType::String)));
    }
}
