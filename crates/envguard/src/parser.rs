//! `.env` file parser
//!
//! Each line of the form `NAME=VALUE` becomes one entry. `NAME` must be a
//! portable shell identifier; any other line (blank, comment, malformed) is
//! skipped without error. Later assignments to the same name win.

use tracing::debug;
use types::{utils::is_valid_identifier, RawEnv};

/// Parse `.env` text into raw key/value pairs
pub fn parse(text: &str) -> RawEnv {
    let mut parsed = RawEnv::new();

    // Splitting on both characters turns CR+LF into a line plus an empty one,
    // and empty lines never match.
    for line in text.split(&['\r', '\n'][..]) {
        if let Some((name, value)) = parse_line(line) {
            parsed.insert(name.to_string(), value);
        }
    }

    debug!(variables = parsed.len(), "Parsed env file");
    parsed
}

fn parse_line(line: &str) -> Option<(&str, String)> {
    let (name, raw) = line.split_once('=')?;
    if !is_valid_identifier(name) {
        return None;
    }
    Some((name, parse_value(raw)))
}

fn parse_value(raw: &str) -> String {
    let value = raw.trim();
    match strip_quotes(value) {
        Some(('"', inner)) => inner.replace("\\n", "\n").replace("\\r", "\r"),
        Some((_, inner)) => inner.to_string(),
        None => value.to_string(),
    }
}

/// Remove one matching pair of outer single or double quotes
fn strip_quotes(value: &str) -> Option<(char, &str)> {
    let quote = value.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    if value.len() >= 2 && value.ends_with(quote) {
        Some((quote, &value[1..value.len() - 1]))
    } else {
        None
    }
}
