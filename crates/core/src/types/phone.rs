//! Normalized phone numbers for checkout and account forms.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum number of digits (plus an optional leading `+`) after stripping
/// formatting characters.
const MIN_LEN: usize = 10;

/// Errors that can occur when parsing a phone number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneError {
    #[error("phone number is empty")]
    Empty,
    #[error("phone number is too short: {0}")]
    TooShort(String),
}

/// A phone number normalized to digits and an optional leading `+`.
///
/// Normalization strips spaces, dashes, parentheses and anything else that is
/// not a digit or `+`, then requires at least ten remaining characters -
/// enough for a local Ukrainian number (`0671234567`) or an international one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Normalize and validate a raw phone input.
    ///
    /// # Errors
    ///
    /// Returns `PhoneError` if the input is empty after normalization or has
    /// fewer than ten characters.
    pub fn parse(raw: &str) -> Result<Self, PhoneError> {
        let normalized: String = raw
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();

        if normalized.is_empty() {
            return Err(PhoneError::Empty);
        }
        if normalized.len() < MIN_LEN {
            return Err(PhoneError::TooShort(normalized));
        }

        Ok(Self(normalized))
    }

    /// The normalized phone string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Phone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_formatting() {
        let phone = Phone::parse("+38 (067) 123-45-67").expect("parse");
        assert_eq!(phone.as_str(), "+380671234567");
    }

    #[test]
    fn test_parse_local_number() {
        let phone = Phone::parse("0671234567").expect("parse");
        assert_eq!(phone.as_str(), "0671234567");
    }

    #[test]
    fn test_parse_rejects_short() {
        assert_eq!(
            Phone::parse("123-456"),
            Err(PhoneError::TooShort("123456".to_owned()))
        );
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(Phone::parse(""), Err(PhoneError::Empty));
        assert_eq!(Phone::parse("abc def"), Err(PhoneError::Empty));
    }
}
