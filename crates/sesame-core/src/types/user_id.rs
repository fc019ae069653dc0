//! User identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, InvalidInputError};

/// A validated user identifier.
///
/// The auth backend keys accounts (and their profile rows) by UUID.
///
/// # Example
///
/// ```
/// use sesame_core::UserId;
///
/// let id = UserId::new("550e8400-e29b-41d4-a716-446655440000").unwrap();
/// assert_eq!(id.as_str().len(), 36);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Create a new user id from a string, validating the UUID format.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let uuid = Uuid::parse_str(s).map_err(|e| InvalidInputError::UserId {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(uuid))
    }

    /// Create a user id from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns the canonical hyphenated string form.
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for UserId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0.to_string()
    }
}
