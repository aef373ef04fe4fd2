use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use userhub_core::{User, UserId};

use super::{RepositoryError, UserRepository, UserStream};

#[derive(Debug, Default)]
struct Rows {
    next_seq: u64,
    // seq keeps insertion order for `find_all`.
    by_id: HashMap<UserId, (u64, User)>,
}

impl Rows {
    fn email_taken_by_other(&self, email: &str, id: Option<&UserId>) -> bool {
        self.by_id
            .iter()
            .any(|(k, (_, u))| u.email == email && Some(k) != id)
    }
}

/// In-memory user store.
///
/// Intended for tests/dev. Enforces the same `email` uniqueness constraint as the
/// Postgres backend.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    rows: RwLock<Rows>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, RepositoryError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.by_id.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }
}

fn duplicate_email(email: &str) -> RepositoryError {
    RepositoryError::DuplicateKey(format!(
        "unique constraint users_email_key violated: email dup key {{ email: \"{email}\" }}"
    ))
}

fn poisoned() -> RepositoryError {
    RepositoryError::Backend("lock poisoned".to_string())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, mut user: User) -> Result<User, RepositoryError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        if rows.email_taken_by_other(&user.email, None) {
            return Err(duplicate_email(&user.email));
        }

        let id = UserId::generate();
        user.id = Some(id.clone());
        let seq = rows.next_seq;
        rows.next_seq += 1;
        rows.by_id.insert(id, (seq, user.clone()));
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.by_id.get(id).map(|(_, u)| u.clone()))
    }

    fn find_all(&self) -> UserStream<'_> {
        let snapshot = match self.rows.read() {
            Ok(rows) => {
                let mut all: Vec<(u64, User)> = rows.by_id.values().cloned().collect();
                all.sort_by_key(|(seq, _)| *seq);
                all.into_iter().map(|(_, u)| Ok(u)).collect::<Vec<_>>()
            }
            Err(_) => vec![Err(poisoned())],
        };
        Box::pin(tokio_stream::iter(snapshot))
    }

    async fn upsert(&self, user: User) -> Result<User, RepositoryError> {
        let Some(id) = user.id.clone() else {
            return self.insert(user).await;
        };

        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        if rows.email_taken_by_other(&user.email, Some(&id)) {
            return Err(duplicate_email(&user.email));
        }

        let existing_seq = rows.by_id.get(&id).map(|(seq, _)| *seq);
        let seq = match existing_seq {
            Some(seq) => seq,
            None => {
                let seq = rows.next_seq;
                rows.next_seq += 1;
                seq
            }
        };
        rows.by_id.insert(id, (seq, user.clone()));
        Ok(user)
    }

    async fn delete_by_id(&self, id: &UserId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        rows.by_id.remove(id);
        Ok(())
    }
}
