//! User persistence boundary.
//!
//! The service layer only sees the `UserRepository` trait. Backends are expected
//! to make each single operation atomic and to enforce uniqueness of `email`,
//! reporting violations as `RepositoryError::DuplicateKey`.

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio_stream::Stream;

use userhub_core::{DomainError, User, UserId};

pub use in_memory::InMemoryUserRepository;
#[cfg(feature = "postgres")]
pub use postgres::PostgresUserRepository;

/// Finite, non-restartable stream of stored users.
pub type UserStream<'a> = Pin<Box<dyn Stream<Item = Result<User, RepositoryError>> + Send + 'a>>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// A uniqueness constraint was violated. The message names the key.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("backend failure: {0}")]
    Backend(String),
}

impl From<RepositoryError> for DomainError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::DuplicateKey(msg) => DomainError::duplicate_key(msg),
            RepositoryError::Backend(msg) => DomainError::store(msg),
        }
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user and return it with its assigned id.
    ///
    /// Any `id` already present on `user` is discarded.
    async fn insert(&self, user: User) -> Result<User, RepositoryError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;

    /// Stream every stored user in the backend's natural order.
    fn find_all(&self) -> UserStream<'_>;

    /// Insert or replace by id. A user without an id is inserted with a fresh one.
    async fn upsert(&self, user: User) -> Result<User, RepositoryError>;

    /// Remove a user. Deleting an unknown id is not an error at this level.
    async fn delete_by_id(&self, id: &UserId) -> Result<(), RepositoryError>;
}

#[async_trait]
impl<R> UserRepository for Arc<R>
where
    R: UserRepository + ?Sized,
{
    async fn insert(&self, user: User) -> Result<User, RepositoryError> {
        (**self).insert(user).await
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        (**self).find_by_id(id).await
    }

    fn find_all(&self) -> UserStream<'_> {
        (**self).find_all()
    }

    async fn upsert(&self, user: User) -> Result<User, RepositoryError> {
        (**self).upsert(user).await
    }

    async fn delete_by_id(&self, id: &UserId) -> Result<(), RepositoryError> {
        (**self).delete_by_id(id).await
    }
}
