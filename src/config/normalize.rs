//! Field name normalization.
//!
//! Two names refer to the same field when they agree on their ASCII
//! alphanumeric characters, ignoring case. `Max-Retries`, `max_retries`
//! and `MAXRETRIES` all normalize to `maxretries`.

/// Canonical form of a field name: ASCII alphanumerics only, lowercased.
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Whether two field names refer to the same field.
pub fn names_match(lhs: &str, rhs: &str) -> bool {
    let lhs = lhs.chars().filter(char::is_ascii_alphanumeric);
    let rhs = rhs.chars().filter(char::is_ascii_alphanumeric);
    lhs.map(|c| c.to_ascii_lowercase())
        .eq(rhs.map(|c| c.to_ascii_lowercase()))
}
