//! Opaque bike identifier.
//!
//! A bike id is any string. Ids minted by this workspace are UUID v7
//! (time-ordered) text, but nothing depends on that: ids from other stores
//! (e.g. a 24-hex document id) are carried through unchanged. On the wire
//! the id is a plain JSON string.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a bike in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BikeId(String);

impl BikeId {
    /// Mint a fresh identifier (UUID v7 text).
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Default for BikeId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for BikeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BikeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for BikeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for BikeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<BikeId> for String {
    fn from(id: BikeId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_unique_uuid_text() {
        let a = BikeId::new();
        let b = BikeId::new();
        assert_ne!(a, b);
        assert!(a.as_str().parse::<Uuid>().is_ok());
    }

    #[test]
    fn foreign_ids_are_kept_verbatim() {
        let id = BikeId::from("507f1f77bcf86cd799439011");
        assert_eq!(id.to_string(), "507f1f77bcf86cd799439011");
        assert_eq!(BikeId::from("abc").into_inner(), "abc");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = BikeId::from("abc");
        let json = serde_json::to_value(&id).unwrap();
        assert_eq!(json, serde_json::Value::String("abc".to_owned()));
    }

    #[test]
    fn deserializes_any_string() {
        let id: BikeId = serde_json::from_str(r#""not-a-uuid""#).unwrap();
        assert_eq!(id.as_str(), "not-a-uuid");
    }
}
