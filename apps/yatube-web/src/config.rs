//! Application configuration loaded from environment variables.

use std::env;

use yatube_core::services::GroupFeedScope;
use yatube_infra::JwtConfig;
use yatube_infra::database::DatabaseConfig;

/// A group created at startup when the store has no group with this slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedGroup {
    pub slug: String,
    pub title: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub group_feed_scope: GroupFeedScope,
    pub cookie_secure: bool,
    pub seed_groups: Vec<SeedGroup>,
    pub jwt: JwtConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database: None,
            group_feed_scope: GroupFeedScope::default(),
            cookie_secure: false,
            seed_groups: Vec::new(),
            jwt: JwtConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        });

        let group_feed_scope = match env::var("GROUP_FEED_SCOPE") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("{e}, falling back to the global feed");
                GroupFeedScope::default()
            }),
            Err(_) => defaults.group_feed_scope,
        };

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            database,
            group_feed_scope,
            cookie_secure: env::var("COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.cookie_secure),
            seed_groups: env::var("SEED_GROUPS")
                .map(|raw| parse_seed_groups(&raw))
                .unwrap_or_default(),
            jwt: JwtConfig::from_env(),
        }
    }
}

/// Parse `slug:title` pairs separated by commas.
/// Example: SEED_GROUPS=cats:Коты,dogs:Собаки
pub fn parse_seed_groups(raw: &str) -> Vec<SeedGroup> {
    let mut groups = Vec::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        match entry.split_once(':') {
            Some((slug, title)) if !slug.trim().is_empty() && !title.trim().is_empty() => {
                groups.push(SeedGroup {
                    slug: slug.trim().to_string(),
                    title: title.trim().to_string(),
                });
            }
            _ => tracing::warn!(entry, "Ignoring malformed SEED_GROUPS entry"),
        }
    }

    groups
}
