//! Postgres-backed user repository.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | RepositoryError |
//! |------------|----------------------|-----------------|
//! | Database (unique violation) | `23505` | `DuplicateKey` (message names the constraint) |
//! | Database (other) | Any other | `Backend` |
//! | PoolClosed / other | N/A | `Backend` |

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tokio_stream::StreamExt;
use tracing::instrument;

use userhub_core::{User, UserId};

use super::{RepositoryError, UserRepository, UserStream};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    password TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT users_email_key UNIQUE (email)
)
"#;

/// Postgres-backed user store.
///
/// Uses an SQLx connection pool, so it is `Send + Sync` and cheap to share. Every
/// operation is a single statement; no multi-statement transactions are used.
pub struct PostgresUserRepository {
    pool: Arc<PgPool>,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the `users` table (with its email uniqueness constraint) if absent.
    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

fn row_to_user(row: &PgRow) -> Result<User, RepositoryError> {
    let read = |col: &str| {
        row.try_get::<String, _>(col)
            .map_err(|e| RepositoryError::Backend(format!("failed to read column {col}: {e}")))
    };
    Ok(User {
        id: Some(UserId::new(read("id")?)),
        name: read("name")?,
        email: read("email")?,
        password: read("password")?,
    })
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => {
                    let constraint = db_err.constraint().unwrap_or("unknown");
                    RepositoryError::DuplicateKey(format!("{msg} (constraint {constraint})"))
                }
                _ => RepositoryError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            RepositoryError::Backend(format!("connection pool closed in {}", operation))
        }
        other => RepositoryError::Backend(format!("{} failed: {}", operation, other)),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn insert(&self, user: User) -> Result<User, RepositoryError> {
        let id = UserId::generate();
        let row = sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password
            "#,
        )
        .bind(id.as_str())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_user", e))?;

        row_to_user(&row)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT id, name, email, password FROM users WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_user", e))?;

        row.as_ref().map(row_to_user).transpose()
    }

    fn find_all(&self) -> UserStream<'_> {
        let rows = sqlx::query("SELECT id, name, email, password FROM users ORDER BY created_at, id")
            .fetch(&*self.pool);
        Box::pin(rows.map(|row| {
            row.map_err(|e| map_sqlx_error("list_users", e))
                .and_then(|r| row_to_user(&r))
        }))
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn upsert(&self, user: User) -> Result<User, RepositoryError> {
        let id = user.id.clone().unwrap_or_else(UserId::generate);
        let row = sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                email = EXCLUDED.email,
                password = EXCLUDED.password
            RETURNING id, name, email, password
            "#,
        )
        .bind(id.as_str())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("upsert_user", e))?;

        row_to_user(&row)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_by_id(&self, id: &UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_str())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_user", e))?;
        Ok(())
    }
}
