use async_trait::async_trait;

use crate::domain::{Group, GroupId, NewPost, Post, PostId, User, UserId};
use crate::error::RepoError;

/// Generic repository trait for entities keyed by a client-generated ID.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, UserId> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, RepoError>;
}

/// Group repository.
#[async_trait]
pub trait GroupRepository: BaseRepository<Group, GroupId> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError>;

    async fn find_by_ids(&self, ids: &[GroupId]) -> Result<Vec<Group>, RepoError>;

    /// All groups ordered by title, used as form choices.
    async fn find_all(&self) -> Result<Vec<Group>, RepoError>;
}

/// Which posts a listing query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Author(UserId),
    /// Posts whose primary group is the given group.
    Group(GroupId),
}

/// Post repository.
///
/// Listings are always ordered by `pub_date` descending, then `id` descending.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError>;

    /// Store a new post; the store assigns the id.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Persist text and group associations of an existing post.
    async fn update(&self, post: Post) -> Result<Post, RepoError>;

    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError>;

    async fn list(&self, filter: PostFilter, offset: u64, limit: u64)
    -> Result<Vec<Post>, RepoError>;
}
