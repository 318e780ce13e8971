//! Utility functions and helpers

/// Shorten a raw value for logging. Values may be secrets.
pub fn sanitize_for_logging(s: &str) -> String {
    let count = s.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }

    let head: String = s.chars().take(2).collect();
    format!("{}...({} chars)", head, count)
}

/// Whether `name` is a portable shell variable name: `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
