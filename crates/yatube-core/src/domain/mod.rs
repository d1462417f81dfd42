//! Domain entities - the core business objects.

mod group;
mod post;
mod user;

pub use group::{Group, GroupId};
pub use post::{NewPost, Post, PostCard, PostDraft, PostId};
pub use user::{User, UserId};
