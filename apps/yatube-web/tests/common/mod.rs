//! Shared test context: an app state over in-memory stores plus seed helpers.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use chrono::{Duration, Utc};
use yatube_core::domain::{Group, NewPost, Post, PostDraft, User};
use yatube_core::ports::{PostFilter, TokenService};
use yatube_infra::{Argon2PasswordService, JwtConfig, JwtTokenService};
use yatube_web::config::AppConfig;
use yatube_web::middleware::auth::SESSION_COOKIE;
use yatube_web::state::{AppState, Repositories};

/// Build the application service for a [`TestContext`].
macro_rules! app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(yatube_web::observability::RequestIdMiddleware)
                .app_data(actix_web::web::Data::new($ctx.state.clone()))
                .configure(yatube_web::handlers::configure_routes)
                .default_service(actix_web::web::to(yatube_web::handlers::not_found)),
        )
        .await
    };
}

pub struct TestContext {
    pub state: AppState,
    pub repos: Repositories,
    tokens: Arc<JwtTokenService>,
    minutes: AtomicI64,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let repos = Repositories::in_memory();
        let tokens = Arc::new(JwtTokenService::new(JwtConfig::default()));
        let state = AppState::build(
            repos.clone(),
            tokens.clone(),
            Arc::new(Argon2PasswordService::new()),
            &config,
        );

        Self {
            state,
            repos,
            tokens,
            minutes: AtomicI64::new(0),
        }
    }

    pub async fn user(&self, username: &str) -> User {
        self.repos
            .users
            .insert(User::new(username, "unused-hash"))
            .await
            .unwrap()
    }

    pub async fn group(&self, slug: &str, title: &str) -> Group {
        self.repos
            .groups
            .insert(Group::new(title, slug, "Тестовое описание"))
            .await
            .unwrap()
    }

    /// Each post is published one minute after the previous one.
    pub async fn post(&self, author: &User, text: &str, group: Option<&Group>) -> Post {
        let minute = self.minutes.fetch_add(1, Ordering::SeqCst);
        let pub_date = Utc::now() - Duration::days(1) + Duration::minutes(minute);
        let draft = PostDraft {
            text: text.to_string(),
            group_id: group.map(|g| g.id),
            groups: vec![],
        };

        self.repos
            .posts
            .create(NewPost::published_at(author.id, draft, pub_date))
            .await
            .unwrap()
    }

    pub async fn post_count(&self) -> u64 {
        self.repos.posts.count(PostFilter::All).await.unwrap()
    }

    pub async fn stored(&self, post: &Post) -> Post {
        self.repos.posts.find_by_id(post.id).await.unwrap().unwrap()
    }

    /// Session cookie logged in as `user`.
    pub fn session(&self, user: &User) -> Cookie<'static> {
        let token = self.tokens.generate_token(user.id, &user.username).unwrap();
        Cookie::new(SESSION_COOKIE, token)
    }
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(actix_web::http::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn body_text<B: MessageBody>(resp: ServiceResponse<B>) -> String {
    let bytes = actix_web::test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).unwrap()
}
