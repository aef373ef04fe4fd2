//! Entity/DTO mapping.
//!
//! All mappings are pure and total. Fields are listed explicitly so the partial
//! update contract stays auditable.

use crate::user::{User, UserRequest, UserResponse};

/// Converts between `UserRequest`/`UserResponse` and the `User` entity.
#[derive(Debug, Default, Clone, Copy)]
pub struct UserMapper;

impl UserMapper {
    pub fn new() -> Self {
        Self
    }

    /// Build a fresh, not-yet-persisted entity from a create request.
    ///
    /// `id` is always left unset so the store assigns a new one.
    pub fn to_entity(&self, request: &UserRequest) -> User {
        User {
            id: None,
            name: request.name.clone().unwrap_or_default(),
            email: request.email.clone().unwrap_or_default(),
            password: request.password.clone().unwrap_or_default(),
        }
    }

    /// Overlay every present field of `request` onto `existing`.
    ///
    /// `id` and fields absent from the request keep their previous values.
    pub fn merge_into(&self, request: &UserRequest, existing: User) -> User {
        let User {
            id,
            name,
            email,
            password,
        } = existing;

        User {
            id,
            name: request.name.clone().unwrap_or(name),
            email: request.email.clone().unwrap_or(email),
            password: request.password.clone().unwrap_or(password),
        }
    }

    pub fn to_response(&self, entity: User) -> UserResponse {
        UserResponse {
            id: entity.id.map(String::from).unwrap_or_default(),
            name: entity.name,
            email: entity.email,
            password: entity.password,
        }
    }
}
