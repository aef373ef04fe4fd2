use std::sync::Arc;

use userhub_core::UserMapper;
use userhub_infra::{AppConfig, InMemoryUserRepository, UserRepository, UserService};

/// User service over a type-erased repository, so backends can be picked at startup.
pub type DynUserService = UserService<Arc<dyn UserRepository>>;

#[derive(Clone)]
pub struct AppServices {
    pub users: DynUserService,
}

impl AppServices {
    pub fn with_repository(repository: Arc<dyn UserRepository>) -> Self {
        Self {
            users: UserService::new(repository, UserMapper::new()),
        }
    }

    pub fn in_memory() -> Self {
        Self::with_repository(Arc::new(InMemoryUserRepository::new()))
    }
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    if config.use_persistent_stores {
        #[cfg(feature = "postgres")]
        {
            return build_persistent_services(config).await;
        }
        #[cfg(not(feature = "postgres"))]
        {
            tracing::warn!(
                "USE_PERSISTENT_STORES=true but postgres feature not enabled, falling back to in-memory"
            );
        }
    }

    tracing::info!("using in-memory user store");
    Ok(AppServices::in_memory())
}

#[cfg(feature = "postgres")]
async fn build_persistent_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    use anyhow::Context;
    use userhub_infra::PostgresUserRepository;

    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set when USE_PERSISTENT_STORES=true")?;

    let repository = PostgresUserRepository::connect(database_url, config.database_max_connections)
        .await
        .context("failed to connect to Postgres")?;
    repository
        .ensure_schema()
        .await
        .context("failed to create users schema")?;

    tracing::info!("using Postgres user store");
    Ok(AppServices::with_repository(Arc::new(repository)))
}
