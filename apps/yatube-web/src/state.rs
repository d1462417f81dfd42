//! Application state - shared across all handlers.

use std::sync::Arc;

use yatube_core::domain::Group;
use yatube_core::ports::{
    GroupRepository, PasswordService, PostRepository, TokenService, UserRepository,
};
use yatube_core::services::{AccountService, ListingService, PostingService};
use yatube_infra::{
    Argon2PasswordService, InMemoryGroupRepository, InMemoryPostRepository,
    InMemoryUserRepository, JwtTokenService,
};

use crate::config::{AppConfig, SeedGroup};

/// The three stores every service is built from.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            groups: Arc::new(InMemoryGroupRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
        }
    }

    #[cfg(feature = "postgres")]
    pub fn postgres(db: yatube_infra::database::DbConn) -> Self {
        use yatube_infra::{
            PostgresGroupRepository, PostgresPostRepository, PostgresUserRepository,
        };

        Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            groups: Arc::new(PostgresGroupRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db)),
        }
    }
}

/// Shared application state. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub listings: Arc<ListingService>,
    pub posting: Arc<PostingService>,
    pub accounts: Arc<AccountService>,
    pub tokens: Arc<dyn TokenService>,
    pub cookie_secure: bool,
}

impl AppState {
    /// Wire the services over the given stores.
    pub fn build(
        repos: Repositories,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        config: &AppConfig,
    ) -> Self {
        let listings = ListingService::new(
            repos.posts.clone(),
            repos.users.clone(),
            repos.groups.clone(),
        )
        .with_group_feed_scope(config.group_feed_scope);

        let posting = PostingService::new(
            repos.posts.clone(),
            repos.users.clone(),
            repos.groups.clone(),
        );

        Self {
            listings: Arc::new(listings),
            posting: Arc::new(posting),
            accounts: Arc::new(AccountService::new(repos.users, passwords, tokens.clone())),
            tokens,
            cookie_secure: config.cookie_secure,
        }
    }

    /// Build the application state with the store the configuration asks for.
    /// A configured database that cannot be reached is a startup error.
    pub async fn from_config(config: &AppConfig) -> std::io::Result<Self> {
        let repos = Self::repositories(config).await?;
        seed_groups(repos.groups.as_ref(), &config.seed_groups).await;

        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        tracing::info!(
            group_feed_scope = ?config.group_feed_scope,
            "Application state initialized"
        );

        Ok(Self::build(repos, tokens, passwords, config))
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> std::io::Result<Repositories> {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Ok(Repositories::in_memory());
        };

        match yatube_infra::database::connect(db_config).await {
            Ok(db) => Ok(Repositories::postgres(db)),
            Err(e) => {
                tracing::error!("Failed to connect to database: {}", e);
                Err(std::io::Error::other(format!("database connection failed: {e}")))
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(config: &AppConfig) -> std::io::Result<Repositories> {
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL is ignored without the postgres feature");
        }
        tracing::info!("Running without postgres feature - using in-memory repositories");
        Ok(Repositories::in_memory())
    }
}

/// Create configured groups whose slug is not taken yet.
pub async fn seed_groups(groups: &dyn GroupRepository, seeds: &[SeedGroup]) {
    for seed in seeds {
        match groups.find_by_slug(&seed.slug).await {
            Ok(Some(_)) => {}
            Ok(None) => match groups
                .insert(Group::new(seed.title.clone(), seed.slug.clone(), String::new()))
                .await
            {
                Ok(group) => tracing::info!(slug = %group.slug, "Seeded group"),
                Err(e) => tracing::warn!(slug = %seed.slug, "Failed to seed group: {}", e),
            },
            Err(e) => tracing::warn!(slug = %seed.slug, "Failed to look up group: {}", e),
        }
    }
}
