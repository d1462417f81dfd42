//! Shared fixtures: an in-memory store seeded the way most tests need it.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use yatube_core::domain::{Group, NewPost, Post, PostDraft, User};
use yatube_core::ports::{BaseRepository, PostRepository};
use yatube_infra::{InMemoryGroupRepository, InMemoryPostRepository, InMemoryUserRepository};

pub struct Store {
    pub users: Arc<InMemoryUserRepository>,
    pub groups: Arc<InMemoryGroupRepository>,
    pub posts: Arc<InMemoryPostRepository>,
    clock: DateTime<Utc>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            groups: Arc::new(InMemoryGroupRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            clock: Utc::now() - Duration::days(1),
        }
    }

    pub async fn user(&self, username: &str) -> User {
        self.users
            .insert(User::new(username, "unused-hash"))
            .await
            .unwrap()
    }

    pub async fn group(&self, slug: &str, title: &str) -> Group {
        self.groups
            .insert(Group::new(title, slug, "Тестовое описание"))
            .await
            .unwrap()
    }

    /// Store a post; each call is published one minute after the previous one.
    pub async fn post(&mut self, author: &User, text: &str, group: Option<&Group>) -> Post {
        self.clock += Duration::minutes(1);
        let draft = PostDraft {
            text: text.to_string(),
            group_id: group.map(|g| g.id),
            groups: vec![],
        };

        self.posts
            .create(NewPost::published_at(author.id, draft, self.clock))
            .await
            .unwrap()
    }
}
