//! Infrastructure layer: persistence, service orchestration, configuration.

pub mod config;
pub mod repository;
pub mod user_service;

pub use config::{AppConfig, ConfigError};
pub use repository::{InMemoryUserRepository, RepositoryError, UserRepository, UserStream};
pub use user_service::UserService;

#[cfg(feature = "postgres")]
pub use repository::PostgresUserRepository;
