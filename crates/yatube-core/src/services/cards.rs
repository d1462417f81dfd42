use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{GroupId, Post, PostCard, UserId};
use crate::error::DomainError;
use crate::ports::{GroupRepository, UserRepository};

/// Joins posts with their authors and groups for display.
#[derive(Clone)]
pub(crate) struct CardBuilder {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
}

impl CardBuilder {
    pub(crate) fn new(users: Arc<dyn UserRepository>, groups: Arc<dyn GroupRepository>) -> Self {
        Self { users, groups }
    }

    pub(crate) async fn one(&self, post: Post) -> Result<PostCard, DomainError> {
        let mut cards = self.many(vec![post]).await?;
        cards
            .pop()
            .ok_or_else(|| DomainError::Internal("post card lost during hydration".to_string()))
    }

    pub(crate) async fn many(&self, posts: Vec<Post>) -> Result<Vec<PostCard>, DomainError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let mut author_ids: Vec<UserId> = posts.iter().map(|p| p.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let mut group_ids: Vec<GroupId> = posts
            .iter()
            .flat_map(|p| p.group_id.into_iter().chain(p.groups.iter().copied()))
            .collect();
        group_ids.sort_unstable();
        group_ids.dedup();

        let authors: HashMap<_, _> = self
            .users
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let groups: HashMap<_, _> = if group_ids.is_empty() {
            HashMap::new()
        } else {
            self.groups
                .find_by_ids(&group_ids)
                .await?
                .into_iter()
                .map(|g| (g.id, g))
                .collect()
        };

        posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.author_id).cloned().ok_or_else(|| {
                    DomainError::Internal(format!("post {} references a missing author", post.id))
                })?;

                Ok(PostCard {
                    id: post.id,
                    group: post.group_id.and_then(|id| groups.get(&id).cloned()),
                    groups: post
                        .groups
                        .iter()
                        .filter_map(|id| groups.get(id).cloned())
                        .collect(),
                    text: post.text,
                    pub_date: post.pub_date,
                    author,
                })
            })
            .collect()
    }
}
