//! Conversion of validated raw values into typed values

use crate::validation::{ValidatedEnv, BASE64};
use base64::Engine;
use types::{SchemaType, TypedEnv, Value};

/// Convert every declared key of a validated environment to its typed value.
///
/// Uses the schema `env` was validated against. Absent or empty keys take
/// their default, or `None` when there is none. The result holds exactly the
/// keys that schema declares.
pub fn coerce(env: ValidatedEnv<'_>) -> TypedEnv {
    let mut typed = TypedEnv::new();

    for (key, config) in env.schema().iter() {
        let value = match env.get(key) {
            Some(raw) => Some(coerce_value(&config.kind, raw)),
            None => config.default.clone(),
        };
        typed.insert(key, value);
    }

    typed
}

// Grammars were checked by `validate`, so the fallbacks below are unreachable.
fn coerce_value(kind: &SchemaType, raw: &str) -> Value {
    match kind {
        SchemaType::Boolean => Value::Boolean(raw == "true"),
        SchemaType::Number => Value::Number(raw.parse().unwrap_or_default()),
        SchemaType::Buffer => Value::Buffer(BASE64.decode(raw).unwrap_or_default()),
        SchemaType::String | SchemaType::Pattern(_) | SchemaType::OneOf(_) => {
            Value::String(raw.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{normalize::normalize, validation::validate};
    use proptest::prelude::*;
    use types::{KeySpec, RawEnv, Schema};

    fn env(pairs: &[(&str, &str)]) -> RawEnv {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn run(schema: Schema, raw: &RawEnv) -> TypedEnv {
        let schema = normalize(&schema);
        let validated = validate(&schema, raw).unwrap();
        coerce(validated)
    }

    #[test]
    fn test_boolean() {
        let schema = || Schema::new().key("KEY", SchemaType::Boolean);
        assert_eq!(run(schema(), &env(&[("KEY", "true")])).boolean("KEY"), Some(true));
        assert_eq!(run(schema(), &env(&[("KEY", "false")])).boolean("KEY"), Some(false));

        let with_default = Schema::new().key("KEY", KeySpec::new(SchemaType::Boolean).with_default(true));
        assert_eq!(run(with_default, &RawEnv::new()).boolean("KEY"), Some(true));
    }

    #[test]
    fn test_buffer() {
        let schema = Schema::new().key("KEY", SchemaType::Buffer);
        let typed = run(schema, &env(&[("KEY", "8J+Sjg==")]));
        assert_eq!(typed.buffer("KEY"), Some("💎".as_bytes()));

        let with_default = Schema::new().key(
            "KEY",
            KeySpec::new(SchemaType::Buffer).with_default("🎉".as_bytes()),
        );
        assert_eq!(run(with_default, &RawEnv::new()).buffer("KEY"), Some("🎉".as_bytes()));
    }

    #[test]
    fn test_number() {
        let schema = || Schema::new().key("KEY", SchemaType::Number);
        assert_eq!(run(schema(), &env(&[("KEY", "1234")])).number("KEY"), Some(1234));
        assert_eq!(run(schema(), &env(&[("KEY", "0")])).number("KEY"), Some(0));
        assert_eq!(run(schema(), &env(&[("KEY", "-1234")])).number("KEY"), Some(-1234));
        assert_eq!(
            run(schema(), &env(&[("KEY", "-999999999999999")])).number("KEY"),
            Some(-999_999_999_999_999)
        );
    }

    #[test]
    fn test_number_default() {
        let schema = || Schema::new().key("KEY", KeySpec::new(SchemaType::Number).with_default(10));
        assert_eq!(run(schema(), &RawEnv::new()).number("KEY"), Some(10));
        assert_eq!(run(schema(), &env(&[("KEY", "")])).number("KEY"), Some(10));
        assert_eq!(run(schema(), &env(&[("KEY", "7")])).number("KEY"), Some(7));
    }

    #[test]
    fn test_strings_pass_through() {
        let schema = Schema::new()
            .key("REGEXP", SchemaType::pattern("abc").unwrap())
            .key("STRING", SchemaType::String)
            .key("UNION", SchemaType::one_of(["abc"]));
        let typed = run(
            schema,
            &env(&[("REGEXP", "abc"), ("STRING", "abc"), ("UNION", "abc")]),
        );
        assert_eq!(typed.string("REGEXP"), Some("abc"));
        assert_eq!(typed.string("STRING"), Some("abc"));
        assert_eq!(typed.string("UNION"), Some("abc"));
    }

    #[test]
    fn test_string_defaults() {
        let schema = Schema::new()
            .key("REGEXP", KeySpec::new(SchemaType::pattern("abc").unwrap()).with_default("abc"))
            .key("STRING", KeySpec::new(SchemaType::String).with_default("xyz"))
            .key("UNION", KeySpec::new(SchemaType::one_of(["abc", "def"])).with_default("def"));
        let typed = run(schema, &RawEnv::new());
        assert_eq!(typed.string("REGEXP"), Some("abc"));
        assert_eq!(typed.string("STRING"), Some("xyz"));
        assert_eq!(typed.string("UNION"), Some("def"));
    }

    #[test]
    fn test_result_has_exactly_declared_keys() {
        let schema = Schema::new()
            .key("KEY", SchemaType::String)
            .key("UNSET", KeySpec::new(SchemaType::Number));
        let typed = run(schema, &env(&[("KEY", "value"), ("EXTRA", "ignored")]));

        assert_eq!(typed.len(), 2);
        assert!(typed.contains_key("UNSET"));
        assert_eq!(typed.get("UNSET"), None);
        assert!(!typed.contains_key("EXTRA"));
    }

    #[test]
    fn test_coerces_with_the_validated_schema() {
        let empty = normalize(&Schema::new());
        let raw = env(&[("N", "abc")]);
        let validated = validate(&empty, &raw).unwrap();

        let typed = coerce(validated);
        assert!(typed.is_empty());
        assert!(!typed.contains_key("N"));
    }

    proptest! {
        #[test]
        fn buffer_round_trips(bytes in prop::collection::vec(any::<u8>(), 1..64)) {
            let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
            let typed = run(Schema::new().key("KEY", SchemaType::Buffer), &env(&[("KEY", encoded.as_str())]));
            prop_assert_eq!(typed.buffer("KEY"), Some(bytes.as_slice()));
        }

        #[test]
        fn unpadded_buffer_round_trips(bytes in prop::collection::vec(any::<u8>(), 1..64)) {
            let encoded = base64::engine::general_purpose::STANDARD_NO_PAD.encode(&bytes);
            let typed = run(Schema::new().key("KEY", SchemaType::Buffer), &env(&[("KEY", encoded.as_str())]));
            prop_assert_eq!(typed.buffer("KEY"), Some(bytes.as_slice()));
        }
    }
}
