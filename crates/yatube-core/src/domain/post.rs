use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Group, GroupId, User, UserId};

pub type PostId = i64;

/// Number of characters of the text used as the post's display name.
const DISPLAY_CHARS: usize = 15;

/// Post entity - a text entry written by exactly one author.
///
/// `author_id` and `pub_date` are fixed at creation; edits only touch the
/// text and the group associations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: UserId,
    /// Primary group.
    pub group_id: Option<GroupId>,
    /// Secondary groups.
    pub groups: Vec<GroupId>,
}

impl Post {
    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }

    /// Apply validated form fields, keeping author and publication date.
    pub fn apply(&mut self, draft: PostDraft) {
        self.text = draft.text;
        self.group_id = draft.group_id;
        self.groups = draft.groups;
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short: String = self.text.chars().take(DISPLAY_CHARS).collect();
        f.write_str(&short)
    }
}

/// Validated, author-independent post fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub text: String,
    pub group_id: Option<GroupId>,
    pub groups: Vec<GroupId>,
}

/// A post that has not been stored yet; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: UserId,
    pub group_id: Option<GroupId>,
    pub groups: Vec<GroupId>,
}

impl NewPost {
    /// Create a post owned by `author_id`, published now.
    pub fn new(author_id: UserId, draft: PostDraft) -> Self {
        Self::published_at(author_id, draft, Utc::now())
    }

    pub fn published_at(author_id: UserId, draft: PostDraft, pub_date: DateTime<Utc>) -> Self {
        Self {
            text: draft.text,
            pub_date,
            author_id,
            group_id: draft.group_id,
            groups: draft.groups,
        }
    }
}

/// A post joined with its author and groups, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub id: PostId,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author: User,
    pub group: Option<Group>,
    pub groups: Vec<Group>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn post(text: &str) -> Post {
        Post {
            id: 1,
            text: text.to_string(),
            pub_date: Utc::now(),
            author_id: Uuid::new_v4(),
            group_id: None,
            groups: vec![],
        }
    }

    #[test]
    fn test_display_uses_first_fifteen_chars() {
        let post = post("Тестовый пост про очень длинные тексты");
        assert_eq!(post.to_string(), "Тестовый пост п");
    }

    #[test]
    fn test_apply_keeps_author_and_date() {
        let mut post = post("before");
        let author = post.author_id;
        let pub_date = post.pub_date;
        let group = Uuid::new_v4();

        post.apply(PostDraft {
            text: "after".to_string(),
            group_id: Some(group),
            groups: vec![group],
        });

        assert_eq!(post.text, "after");
        assert_eq!(post.group_id, Some(group));
        assert_eq!(post.author_id, author);
        assert_eq!(post.pub_date, pub_date);
    }
}
