//! User service: business rules on top of a `UserRepository`.
//!
//! ```text
//! save      : map(request) -> insert
//! find_by_id: lookup -> not found? error
//! find_all  : stream everything
//! update    : find_by_id -> merge(request) -> upsert
//! delete    : find_by_id -> delete_by_id
//! ```
//!
//! The service holds no mutable state of its own; all state lives in the
//! repository, so one instance can serve any number of concurrent requests.

use std::pin::Pin;

use tokio_stream::{Stream, StreamExt};

use userhub_core::{DomainError, DomainResult, User, UserId, UserMapper, UserRequest};

use crate::repository::UserRepository;

/// Stream of users as seen by callers of the service.
pub type UserResultStream<'a> = Pin<Box<dyn Stream<Item = DomainResult<User>> + Send + 'a>>;

#[derive(Debug, Clone)]
pub struct UserService<R> {
    repository: R,
    mapper: UserMapper,
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    pub fn new(repository: R, mapper: UserMapper) -> Self {
        Self { repository, mapper }
    }

    pub fn mapper(&self) -> UserMapper {
        self.mapper
    }

    /// Insert a new user. No existence check: a clashing email surfaces as
    /// `DomainError::DuplicateKey`.
    pub async fn save(&self, request: &UserRequest) -> DomainResult<User> {
        let entity = self.mapper.to_entity(request);
        match self.repository.insert(entity).await {
            Ok(user) => {
                tracing::debug!(id = ?user.id, "user created");
                Ok(user)
            }
            Err(e) => {
                let err = DomainError::from(e);
                if let DomainError::DuplicateKey(msg) = &err {
                    tracing::warn!(%msg, "user create rejected by uniqueness constraint");
                }
                Err(err)
            }
        }
    }

    pub async fn find_by_id(&self, id: &UserId) -> DomainResult<User> {
        match self.repository.find_by_id(id).await? {
            Some(user) => Ok(user),
            None => {
                tracing::warn!(%id, "user not found");
                Err(DomainError::object_not_found(id, User::TYPE_NAME))
            }
        }
    }

    /// Every user, yielded one by one in the repository's natural order.
    pub fn find_all(&self) -> UserResultStream<'_> {
        Box::pin(
            self.repository
                .find_all()
                .map(|item| item.map_err(DomainError::from)),
        )
    }

    /// Merge the present fields of `request` onto the stored user and persist it.
    ///
    /// The id never changes; omitted fields keep their stored values.
    pub async fn update(&self, id: &UserId, request: &UserRequest) -> DomainResult<User> {
        let existing = self.find_by_id(id).await?;
        let merged = self.mapper.merge_into(request, existing);
        let saved = self.repository.upsert(merged).await?;
        tracing::debug!(%id, "user updated");
        Ok(saved)
    }

    pub async fn delete(&self, id: &UserId) -> DomainResult<()> {
        self.find_by_id(id).await?;
        self.repository.delete_by_id(id).await?;
        tracing::debug!(%id, "user deleted");
        Ok(())
    }
}
