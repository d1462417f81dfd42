//! In-memory repositories - used when no database is configured and in tests.
//!
//! Note: data is lost on process restart.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use yatube_core::domain::{Group, GroupId, NewPost, Post, PostId, User, UserId};
use yatube_core::error::RepoError;
use yatube_core::ports::{
    BaseRepository, GroupRepository, PostFilter, PostRepository, UserRepository,
};

/// In-memory user repository enforcing unique usernames.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, UserId> for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.id) || users.values().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        users.insert(user.id, user.clone());

        Ok(user)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, RepoError> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }
}

/// In-memory group repository enforcing unique slugs.
#[derive(Default)]
pub struct InMemoryGroupRepository {
    groups: RwLock<Vec<Group>>,
}

impl InMemoryGroupRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Group, GroupId> for InMemoryGroupRepository {
    async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>, RepoError> {
        let groups = self.groups.read().await;
        Ok(groups.iter().find(|g| g.id == id).cloned())
    }

    async fn insert(&self, group: Group) -> Result<Group, RepoError> {
        let mut groups = self.groups.write().await;

        if groups.iter().any(|g| g.id == group.id || g.slug == group.slug) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        groups.push(group.clone());

        Ok(group)
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let groups = self.groups.read().await;
        Ok(groups.iter().find(|g| g.slug == slug).cloned())
    }

    async fn find_by_ids(&self, ids: &[GroupId]) -> Result<Vec<Group>, RepoError> {
        let groups = self.groups.read().await;
        Ok(groups.iter().filter(|g| ids.contains(&g.id)).cloned().collect())
    }

    async fn find_all(&self) -> Result<Vec<Group>, RepoError> {
        let mut groups = self.groups.read().await.clone();
        groups.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(groups)
    }
}

/// In-memory post repository. Ids start at 1 and only grow.
pub struct InMemoryPostRepository {
    posts: RwLock<Vec<Post>>,
    next_id: AtomicI64,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn matches(post: &Post, filter: PostFilter) -> bool {
        match filter {
            PostFilter::All => true,
            PostFilter::Author(id) => post.author_id == id,
            PostFilter::Group(id) => post.group_id == Some(id),
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;

        let post = Post {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            text: new_post.text,
            pub_date: new_post.pub_date,
            author_id: new_post.author_id,
            group_id: new_post.group_id,
            groups: new_post.groups,
        };
        posts.push(post.clone());

        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        let stored = posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or(RepoError::NotFound)?;

        stored.text = post.text;
        stored.group_id = post.group_id;
        stored.groups = post.groups;

        Ok(stored.clone())
    }

    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().filter(|p| Self::matches(p, filter)).count() as u64)
    }

    async fn list(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;

        let mut selected: Vec<&Post> = posts.iter().filter(|p| Self::matches(p, filter)).collect();
        selected.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));

        Ok(selected
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
