//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::{PasswordService, PostRepository, ThemeRepository, TokenService, UserRepository};
use blog_core::{PostService, ThemeService, UserService};
use blog_infra::{Argon2PasswordService, InMemoryStore, JwtTokenService};

#[cfg(feature = "postgres")]
use anyhow::Context;
#[cfg(feature = "postgres")]
use blog_infra::database::{
    DatabaseConfig, DatabaseConnections, PostgresPostRepository, PostgresThemeRepository,
    PostgresUserRepository,
};

use crate::config::AppConfig;

/// Where the stores keep their data.
#[derive(Clone)]
pub enum Storage {
    Memory,
    #[cfg(feature = "postgres")]
    Postgres(DatabaseConnections),
}

impl Storage {
    pub fn name(&self) -> &'static str {
        match self {
            Storage::Memory => "memory",
            #[cfg(feature = "postgres")]
            Storage::Postgres(_) => "postgres",
        }
    }

    pub async fn is_reachable(&self) -> bool {
        match self {
            Storage::Memory => true,
            #[cfg(feature = "postgres")]
            Storage::Postgres(db) => db.is_reachable().await,
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub themes: ThemeService,
    pub posts: PostService,
    pub users: UserService,
    pub tokens: Arc<dyn TokenService>,
    pub storage: Storage,
}

impl AppState {
    /// Build the application state with the storage backend `config` asks for.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        let state = match &config.database {
            #[cfg(feature = "postgres")]
            Some(db_config) => Self::postgres(db_config, tokens, passwords).await?,
            #[cfg(not(feature = "postgres"))]
            Some(_) => {
                tracing::warn!(
                    "DATABASE_URL is set but the server was built without the postgres feature. Using in-memory storage."
                );
                Self::in_memory(tokens, passwords)
            }
            None => {
                tracing::warn!("DATABASE_URL not set. Running with in-memory storage; data is lost on restart.");
                Self::in_memory(tokens, passwords)
            }
        };

        tracing::info!(storage = state.storage.name(), "Application state initialized");
        Ok(state)
    }

    /// State backed by a fresh in-memory store.
    pub fn in_memory(tokens: Arc<dyn TokenService>, passwords: Arc<dyn PasswordService>) -> Self {
        let store = InMemoryStore::new();
        Self::assemble(
            Arc::new(store.themes()),
            Arc::new(store.posts()),
            Arc::new(store.users()),
            tokens,
            passwords,
            Storage::Memory,
        )
    }

    #[cfg(feature = "postgres")]
    async fn postgres(
        config: &DatabaseConfig,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> anyhow::Result<Self> {
        use migration::{Migrator, MigratorTrait};

        let connections = DatabaseConnections::init(config)
            .await
            .context("failed to connect to database")?;

        if config.auto_migrate {
            Migrator::up(&connections.main, None)
                .await
                .context("failed to apply database migrations")?;
            tracing::info!("Database migrations applied");
        }

        let db = connections.main.clone();
        Ok(Self::assemble(
            Arc::new(PostgresThemeRepository::new(db.clone())),
            Arc::new(PostgresPostRepository::new(db.clone())),
            Arc::new(PostgresUserRepository::new(db)),
            tokens,
            passwords,
            Storage::Postgres(connections),
        ))
    }

    fn assemble(
        themes: Arc<dyn ThemeRepository>,
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        storage: Storage,
    ) -> Self {
        Self {
            themes: ThemeService::new(themes.clone()),
            posts: PostService::new(posts, themes),
            users: UserService::new(users, passwords),
            tokens,
            storage,
        }
    }
}
