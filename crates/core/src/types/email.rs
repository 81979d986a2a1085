//! Lightly validated email addresses.
//!
//! Validation intentionally matches the checkout form: one `@`, no
//! whitespace, and a dot somewhere in the domain. Deliverability is the
//! backend's problem.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when parsing an email address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("email is empty")]
    Empty,
    #[error("invalid email format: {0}")]
    Invalid(String),
}

/// A validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parse and validate an email address. Trims surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if the input is empty or malformed.
    pub fn parse(raw: &str) -> Result<Self, EmailError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EmailError::Empty);
        }

        let mut parts = trimmed.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();

        let valid = !local.is_empty()
            && !domain.is_empty()
            && !domain.contains('@')
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !trimmed.chars().any(char::is_whitespace);

        if !valid {
            return Err(EmailError::Invalid(trimmed.to_owned()));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// The validated address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let email = Email::parse("  user@example.com ").expect("parse");
        assert_eq!(email.as_str(), "user@example.com");
    }

    #[test]
    fn test_parse_rejects_missing_at() {
        assert!(Email::parse("userexample.com").is_err());
    }

    #[test]
    fn test_parse_rejects_double_at() {
        assert!(Email::parse("user@@example.com").is_err());
        assert!(Email::parse("user@ex@ample.com").is_err());
    }

    #[test]
    fn test_parse_rejects_dotless_domain() {
        assert!(Email::parse("user@localhost").is_err());
    }

    #[test]
    fn test_parse_rejects_whitespace() {
        assert!(Email::parse("us er@example.com").is_err());
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
    }
}
