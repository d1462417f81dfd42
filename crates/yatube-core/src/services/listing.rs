//! Read-only pages: index, group, profile and post detail.

use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;

use super::cards::CardBuilder;
use super::pagination::{Page, Paginator};
use crate::domain::{Group, PostCard, PostId, User};
use crate::error::DomainError;
use crate::ports::{GroupRepository, PostFilter, PostRepository, UserRepository};

/// Size of the unpaginated preview list on the index and group pages.
pub const PREVIEW_LIMIT: u64 = 10;

pub const INDEX_TITLE: &str = "Это главная страница проекта Yatube";

/// Which posts feed the paginated list of a group page.
///
/// `Global` keeps the established behaviour where only the preview list is
/// scoped to the group; `Group` filters the feed as well.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupFeedScope {
    #[default]
    Global,
    Group,
}

impl FromStr for GroupFeedScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(Self::Global),
            "group" => Ok(Self::Group),
            other => Err(format!("unknown group feed scope: {other}")),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IndexContext {
    pub title: String,
    pub page_obj: Page<PostCard>,
    pub posts: Vec<PostCard>,
}

#[derive(Debug, Serialize)]
pub struct GroupContext {
    pub title: String,
    pub group: Group,
    pub page_obj: Page<PostCard>,
    pub posts: Vec<PostCard>,
}

#[derive(Debug, Serialize)]
pub struct ProfileContext {
    pub title: String,
    pub author: User,
    pub page_obj: Page<PostCard>,
    pub total_posts: u64,
}

#[derive(Debug, Serialize)]
pub struct PostDetailContext {
    pub title: String,
    pub post: PostCard,
    pub total_posts: u64,
}

/// Resolves the public listings. Every call reads the store afresh.
pub struct ListingService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    cards: CardBuilder,
    paginator: Paginator,
    group_feed_scope: GroupFeedScope,
}

impl ListingService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        groups: Arc<dyn GroupRepository>,
    ) -> Self {
        Self {
            cards: CardBuilder::new(users.clone(), groups.clone()),
            posts,
            users,
            groups,
            paginator: Paginator::default(),
            group_feed_scope: GroupFeedScope::default(),
        }
    }

    pub fn with_group_feed_scope(mut self, scope: GroupFeedScope) -> Self {
        self.group_feed_scope = scope;
        self
    }

    pub async fn index(&self, page: Option<i64>) -> Result<IndexContext, DomainError> {
        Ok(IndexContext {
            title: INDEX_TITLE.to_string(),
            page_obj: self.page_of(PostFilter::All, page).await?,
            posts: self.preview(PostFilter::All).await?,
        })
    }

    pub async fn group_posts(
        &self,
        slug: &str,
        page: Option<i64>,
    ) -> Result<GroupContext, DomainError> {
        let group = self
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("group", slug))?;

        let feed = match self.group_feed_scope {
            GroupFeedScope::Global => PostFilter::All,
            GroupFeedScope::Group => PostFilter::Group(group.id),
        };

        Ok(GroupContext {
            title: group.title.clone(),
            page_obj: self.page_of(feed, page).await?,
            posts: self.preview(PostFilter::Group(group.id)).await?,
            group,
        })
    }

    pub async fn profile(
        &self,
        username: &str,
        page: Option<i64>,
    ) -> Result<ProfileContext, DomainError> {
        let author = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))?;

        let page_obj = self.page_of(PostFilter::Author(author.id), page).await?;

        Ok(ProfileContext {
            title: format!("Профайл пользователя {}", author.username),
            total_posts: page_obj.count,
            author,
            page_obj,
        })
    }

    pub async fn post_detail(&self, id: PostId) -> Result<PostDetailContext, DomainError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))?;

        let total_posts = self.posts.count(PostFilter::Author(post.author_id)).await?;
        let title = format!("Пост: {}", post.text.chars().take(30).collect::<String>());

        Ok(PostDetailContext {
            title,
            post: self.cards.one(post).await?,
            total_posts,
        })
    }

    async fn page_of(
        &self,
        filter: PostFilter,
        requested: Option<i64>,
    ) -> Result<Page<PostCard>, DomainError> {
        let count = self.posts.count(filter).await?;
        let window = self.paginator.locate(count, requested);
        let posts = if window.limit == 0 {
            Vec::new()
        } else {
            self.posts.list(filter, window.offset, window.limit).await?
        };

        Ok(Page::new(self.cards.many(posts).await?, window))
    }

    async fn preview(&self, filter: PostFilter) -> Result<Vec<PostCard>, DomainError> {
        let posts = self.posts.list(filter, 0, PREVIEW_LIMIT).await?;
        self.cards.many(posts).await
    }
}
