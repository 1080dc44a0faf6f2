//! Request-shape validation support.
//!
//! Violations are accumulated rather than short-circuited so a response can
//! enumerate every broken rule, and each carries a stable machine-readable
//! code alongside the human-readable message.

use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// A single violated validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Violation {
    /// Human-readable error message
    pub message: String,
    /// Stable machine-readable code, e.g. `EMAIL_INVALID`
    pub code: String,
}

impl Violation {
    #[must_use]
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Parse a path id, accepting only syntactically valid UUID v4 strings.
///
/// # Errors
///
/// Returns a `TEMPLATE_ID_INVALID` violation for anything else (empty,
/// malformed, wrong length, wrong version).
pub fn parse_template_id(value: &str) -> Result<Uuid, Violation> {
    match Uuid::parse_str(value) {
        Ok(id) if id.get_version_num() == 4 => Ok(id),
        _ => Err(Violation::new(
            "Template ID must be a valid UUID v4 format",
            "TEMPLATE_ID_INVALID",
        )),
    }
}

/// Helper predicates for common field formats.
pub mod validators {
    use chrono::NaiveDate;

    /// Plausible RFC-5322 address: one `@`, non-empty local part, dotted
    /// domain, no whitespace. Full grammar enforcement stays with the
    /// mail infrastructure.
    #[must_use]
    pub fn is_email(value: &str) -> bool {
        if value.chars().any(char::is_whitespace) {
            return false;
        }
        let Some((local, domain)) = value.split_once('@') else {
            return false;
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return false;
        }
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return false;
        }
        domain.split('.').all(|part| !part.is_empty())
    }

    /// ISO calendar date, e.g. `1990-01-01`.
    #[must_use]
    pub fn is_date_string(value: &str) -> bool {
        value.parse::<NaiveDate>().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_v4_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_template_id(&id.to_string()), Ok(id));
    }

    #[test]
    fn rejects_malformed_ids() {
        for bad in ["", "not-a-uuid", "123", "550e8400-e29b-41d4-a716-44665544000g"] {
            let err = parse_template_id(bad).unwrap_err();
            assert_eq!(err.code, "TEMPLATE_ID_INVALID");
        }
    }

    #[test]
    fn rejects_non_v4_uuid() {
        // version nibble is 1
        assert!(parse_template_id("550e8400-e29b-11d4-a716-446655440000").is_err());
    }

    #[test]
    fn email_validation() {
        assert!(validators::is_email("test@example.com"));
        assert!(validators::is_email("a.b+c@sub.example.co"));
        assert!(!validators::is_email(""));
        assert!(!validators::is_email("invalid-email"));
        assert!(!validators::is_email("missing@domain"));
        assert!(!validators::is_email("@example.com"));
        assert!(!validators::is_email("two@@example.com"));
        assert!(!validators::is_email("spaced name@example.com"));
        assert!(!validators::is_email("trailing@example.com."));
    }

    #[test]
    fn date_string_validation() {
        assert!(validators::is_date_string("1990-01-01"));
        assert!(!validators::is_date_string(""));
        assert!(!validators::is_date_string("invalid-date"));
        assert!(!validators::is_date_string("1990-13-01"));
        assert!(!validators::is_date_string("01/01/1990"));
    }
}
