//! Item codes

use std::{fmt, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

use crate::error::ErrorKind;

/// Errors raised while parsing an item code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ItemCodeError {
    /// The text was not exactly one printable, non-whitespace character.
    #[error("item code must be a single printable character, got {0:?}")]
    Malformed(String),
}

impl ItemCodeError {
    /// Taxonomy kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ItemCodeError::Malformed(_) => ErrorKind::InvalidArgument,
        }
    }
}

/// Single-character identifier of a catalogue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct ItemCode(char);

impl ItemCode {
    /// Creates an item code from a character.
    ///
    /// # Errors
    ///
    /// Returns [`ItemCodeError::Malformed`] for whitespace or control characters.
    pub fn new(code: char) -> Result<Self, ItemCodeError> {
        if code.is_whitespace() || code.is_control() {
            return Err(ItemCodeError::Malformed(code.to_string()));
        }

        Ok(ItemCode(code))
    }

    /// Returns the code as a character.
    pub fn as_char(self) -> char {
        self.0
    }
}

impl FromStr for ItemCode {
    type Err = ItemCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();

        match (chars.next(), chars.next()) {
            (Some(code), None) => ItemCode::new(code),
            _ => Err(ItemCodeError::Malformed(s.to_string())),
        }
    }
}

impl TryFrom<String> for ItemCode {
    type Error = ItemCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<char> for ItemCode {
    type Error = ItemCodeError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        ItemCode::new(value)
    }
}

impl fmt::Display for ItemCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_single_character() -> TestResult {
        let code: ItemCode = "A".parse()?;

        assert_eq!(code.as_char(), 'A');
        assert_eq!(code.to_string(), "A");

        Ok(())
    }

    #[test]
    fn rejects_empty_and_multi_character_codes() {
        assert_eq!(
            "".parse::<ItemCode>(),
            Err(ItemCodeError::Malformed(String::new()))
        );
        assert_eq!(
            "AA".parse::<ItemCode>(),
            Err(ItemCodeError::Malformed("AA".to_string()))
        );
    }

    #[test]
    fn rejects_whitespace() {
        let err = ItemCode::new(' ').err();

        assert!(matches!(err, Some(ItemCodeError::Malformed(_))));
        assert_eq!(
            err.as_ref().map(ItemCodeError::kind),
            Some(ErrorKind::InvalidArgument)
        );
    }

    #[test]
    fn codes_order_by_character() -> TestResult {
        let a: ItemCode = "A".parse()?;
        let b: ItemCode = "B".parse()?;

        assert!(a < b);

        Ok(())
    }
}
