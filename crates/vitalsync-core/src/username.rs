//! The tenant identity type.
//!
//! A [`Username`] names three things at once: an application-level identity,
//! a PostgreSQL role, and (with a configured prefix) the tenant's private
//! database. Because the name is spliced into DDL as an identifier, the
//! accepted alphabet is deliberately narrow: lowercase ASCII letters, digits,
//! and underscores, starting with a letter, at most 63 bytes (the PostgreSQL
//! identifier limit).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length of a username in bytes.
pub const MAX_USERNAME_LEN: usize = 63;

/// A validated tenant username.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a `Username`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, longer than
    /// [`MAX_USERNAME_LEN`] bytes, does not start with a lowercase letter,
    /// or contains a character outside `[a-z0-9_]`.
    pub fn new(name: &str) -> Result<Self, UsernameError> {
        if name.is_empty() {
            return Err(UsernameError::Empty);
        }
        if name.len() > MAX_USERNAME_LEN {
            return Err(UsernameError::TooLong(name.len()));
        }
        let mut chars = name.chars();
        match chars.next() {
            Some(c) if c.is_ascii_lowercase() => {}
            Some(c) => return Err(UsernameError::InvalidStart(c)),
            None => return Err(UsernameError::Empty),
        }
        for c in chars {
            if !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
                return Err(UsernameError::InvalidChar(c));
            }
        }
        Ok(Self(name.to_owned()))
    }

    /// Return the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Username({})", self.0)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors that can occur when validating a username.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsernameError {
    /// The username is empty.
    #[error("username is empty")]
    Empty,

    /// The username exceeds the PostgreSQL identifier limit.
    #[error("username is {0} bytes, maximum is {MAX_USERNAME_LEN}")]
    TooLong(usize),

    /// The username does not start with a lowercase letter.
    #[error("username must start with a lowercase letter, got {0:?}")]
    InvalidStart(char),

    /// The username contains a character outside the allowed alphabet.
    #[error("username contains invalid character {0:?}")]
    InvalidChar(char),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_simple_names() {
        for name in ["alice", "bob_2", "a", "user_with_underscores"] {
            assert!(Username::new(name).is_ok(), "{name} should be accepted");
        }
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(Username::new(""), Err(UsernameError::Empty));
    }

    #[test]
    fn rejects_overlong() {
        let name = "a".repeat(64);
        assert!(matches!(
            Username::new(&name),
            Err(UsernameError::TooLong(64))
        ));
    }

    #[test]
    fn rejects_invalid_start() {
        assert!(matches!(
            Username::new("1alice"),
            Err(UsernameError::InvalidStart('1'))
        ));
        assert!(matches!(
            Username::new("_alice"),
            Err(UsernameError::InvalidStart('_'))
        ));
    }

    #[test]
    fn rejects_identifier_breakers() {
        for name in ["alice\"; drop", "alice'--", "Alice", "al ice", "al-ice"] {
            assert!(Username::new(name).is_err(), "{name} should be rejected");
        }
    }

    #[test]
    fn serde_roundtrip() {
        let username = Username::new("alice").unwrap();
        let json = serde_json::to_string(&username).unwrap();
        assert_eq!(json, "\"alice\"");
        let parsed: Username = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, username);
    }

    #[test]
    fn serde_rejects_invalid() {
        let result: Result<Username, _> = serde_json::from_str("\"Alice\"");
        assert!(result.is_err());
    }
}
