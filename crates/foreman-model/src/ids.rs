// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const ID_MAX_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    Empty(&'static str),
    Trimmed(&'static str),
    TooLong(&'static str, usize),
    InvalidFormat(&'static str),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(name) => write!(f, "{name} must not be empty"),
            Self::Trimmed(name) => {
                write!(f, "{name} must not contain leading/trailing whitespace")
            }
            Self::TooLong(name, max) => write!(f, "{name} exceeds max length {max}"),
            Self::InvalidFormat(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty("id"));
        }
        if input.trim() != input {
            return Err(ParseError::Trimmed("id"));
        }
        if input.len() > ID_MAX_LEN {
            return Err(ParseError::TooLong("id", ID_MAX_LEN));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TodoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Todo type id. Immutable after creation, restricted to `[a-z0-9_]+`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TypeId(String);

impl TypeId {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty("id"));
        }
        if input.len() > ID_MAX_LEN {
            return Err(ParseError::TooLong("id", ID_MAX_LEN));
        }
        if !input
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(ParseError::InvalidFormat(
                "id must match [a-z0-9_]+ (lowercase letters, digits, underscores)",
            ));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TypeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty("userId"));
        }
        if input.trim() != input {
            return Err(ParseError::Trimmed("userId"));
        }
        if input.len() > ID_MAX_LEN {
            return Err(ParseError::TooLong("userId", ID_MAX_LEN));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_id_accepts_snake_case_and_rejects_uppercase() {
        assert!(TypeId::parse("trailer_check_in").is_ok());
        assert!(TypeId::parse("cycle_count_2").is_ok());
        assert!(TypeId::parse("TrailerCheckIn").is_err());
        assert!(TypeId::parse("has-dash").is_err());
        assert!(TypeId::parse("").is_err());
    }

    #[test]
    fn todo_id_rejects_surrounding_whitespace() {
        assert!(TodoId::parse("todo-001").is_ok());
        assert!(TodoId::parse(" todo-001").is_err());
        assert!(TodoId::parse(&"x".repeat(ID_MAX_LEN + 1)).is_err());
    }
}
