//! User entity and its boundary shapes.

use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// Persisted user record.
///
/// `id` is `None` until the persistence layer assigns one. `email` is the natural
/// business key; uniqueness is enforced by the store, not here.
///
/// Note: `password` is stored and returned exactly as received. No hashing happens
/// anywhere in this system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Option<UserId>,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl User {
    /// Type label used in not-found messages.
    pub const TYPE_NAME: &'static str = "User";

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Inbound user payload, shared by create and (partial) update.
///
/// Absent JSON fields deserialize to `None`. There is deliberately no `id` field:
/// an `id` key sent by a client is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl UserRequest {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }
}

/// Outbound projection of a persisted user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
}
