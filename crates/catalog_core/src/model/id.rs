//! UUID-shaped entity identifier.
//!
//! # Responsibility
//! - Validate caller-supplied identifiers at construction time.
//! - Generate fresh identifiers for new entities.
//!
//! # Invariants
//! - A constructed `EntityId` always matches the canonical 8-4-4-4-12 layout
//!   with version nibble `0..=5` and variant nibble `8|9|a|b`.
//! - Stored text is lowercase.

use crate::model::value_object::ValueObject;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

static ENTITY_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-5][0-9a-f]{3}-[089ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .expect("valid entity id regex")
});

/// Raised when identifier text does not have the canonical UUID layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidIdentifierError {
    value: String,
}

impl InvalidIdentifierError {
    /// Rejected input text.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Display for InvalidIdentifierError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Id must be a valid UUID")
    }
}

impl Error for InvalidIdentifierError {}

/// Stable identity value object for every entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(String);

impl EntityId {
    /// Generates a fresh random (v4) identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Parses caller-supplied identifier text.
    ///
    /// # Errors
    /// - Returns [`InvalidIdentifierError`] when `value` is not a canonical UUID.
    pub fn parse(value: &str) -> Result<Self, InvalidIdentifierError> {
        if !ENTITY_ID_RE.is_match(value) {
            return Err(InvalidIdentifierError {
                value: value.to_string(),
            });
        }
        Ok(Self(value.to_ascii_lowercase()))
    }

    /// Canonical lowercase text form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueObject for EntityId {}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityId {
    type Err = InvalidIdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for EntityId {
    fn from(value: Uuid) -> Self {
        Self(value.hyphenated().to_string())
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
