//! Input validation primitives.
//!
//! Provides ergonomic helpers for common validation patterns:
//! - Validating non-empty strings
//! - Validating identifier-shaped config values
//!
//! These replace verbose ok_or_else + Error::config_invalid_value chains.

use crate::error::{Error, Result};

/// Require a config string to be non-empty after trimming.
///
/// Returns a reference to the trimmed string on success.
pub fn require_non_empty<'a>(value: &'a str, key: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::config_invalid_value(key, None, "must not be empty"))
    } else {
        Ok(trimmed)
    }
}

/// Require a config string to be a plain identifier (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn require_identifier<'a>(value: &'a str, key: &str) -> Result<&'a str> {
    if is_identifier(value) {
        Ok(value)
    } else {
        Err(Error::config_invalid_value(
            key,
            Some(value.to_string()),
            "must be an identifier (letters, digits, underscore; not starting with a digit)",
        ))
    }
}

pub fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_non_empty_trims() {
        assert_eq!(require_non_empty("  AppColors. ", "skip").unwrap(), "AppColors.");
    }

    #[test]
    fn require_non_empty_rejects_whitespace() {
        let err = require_non_empty("   ", "skip.pattern").unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_value");
        assert_eq!(err.details["key"], "skip.pattern");
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("textPrimary"));
        assert!(is_identifier("_private2"));
        assert!(!is_identifier("2fast"));
        assert!(!is_identifier("Semantic.Colors"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn require_identifier_reports_value() {
        let err = require_identifier("bad name", "rules.direct.symbol").unwrap_err();
        assert_eq!(err.details["value"], "bad name");
    }
}
