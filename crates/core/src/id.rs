//! User identifier.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of a persisted user.
///
/// Ids are assigned by the persistence layer and are never taken from client input
/// on create. Any string is accepted from a path segment: unknown ids are a
/// not-found condition, not a malformed request.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Mint a fresh identifier (UUIDv7, time-ordered).
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for UserId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = UserId::generate();
        let b = UserId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = UserId::new("12345");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"12345\"");
    }
}
