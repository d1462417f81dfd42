//! Create and edit posts.
//!
//! The requester is passed explicitly to every operation. A missing
//! requester is rejected with [`DomainError::Unauthenticated`] before any
//! lookup or validation happens.

use std::sync::Arc;

use serde::Serialize;

use super::cards::CardBuilder;
use super::form::{FormErrors, PostInput};
use crate::domain::{Group, NewPost, Post, PostCard, PostId, User, UserId};
use crate::error::DomainError;
use crate::ports::{GroupRepository, PostRepository, UserRepository};

/// A post form with its current values, errors and group choices.
#[derive(Debug, Clone, Serialize)]
pub struct BoundPostForm {
    #[serde(flatten)]
    pub data: PostInput,
    pub errors: FormErrors,
    pub choices: Vec<Group>,
}

/// Context for the create/edit page. `post` is only present when editing.
#[derive(Debug, Clone, Serialize)]
pub struct PostFormContext {
    pub form: BoundPostForm,
    pub is_edit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<PostCard>,
}

#[derive(Debug)]
pub enum CreateOutcome {
    Created { post: Post, author: User },
    Invalid(PostFormContext),
}

#[derive(Debug)]
pub enum EditOutcome {
    /// Author opened the edit page.
    Form(PostFormContext),
    Updated(Post),
    Invalid(PostFormContext),
    /// Requester is not the author; nothing was changed.
    Forbidden { post_id: PostId },
}

pub struct PostingService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    cards: CardBuilder,
}

impl PostingService {
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
        }
    }

    /// Empty form for a new post.
    pub async fn new_post_form(
        &self,
        requester: Option<UserId>,
    ) -> Result<PostFormContext, DomainError> {
        self.authenticate(requester).await?;

        Ok(PostFormContext {
            form: self.bind(PostInput::default(), FormErrors::default()).await?,
            is_edit: false,
            post: None,
        })
    }

    pub async fn create(
        &self,
        requester: Option<UserId>,
        input: PostInput,
    ) -> Result<CreateOutcome, DomainError> {
        let author = self.authenticate(requester).await?;
        let choices = self.groups.find_all().await?;

        match input.validate(&choices) {
            Ok(draft) => {
                let post = self.posts.create(NewPost::new(author.id, draft)).await?;
                Ok(CreateOutcome::Created { post, author })
            }
            Err(errors) => Ok(CreateOutcome::Invalid(PostFormContext {
                form: BoundPostForm {
                    data: input,
                    errors,
                    choices,
                },
                is_edit: false,
                post: None,
            })),
        }
    }

    /// Prefilled form for the post's author.
    pub async fn edit_form(
        &self,
        requester: Option<UserId>,
        post_id: PostId,
    ) -> Result<EditOutcome, DomainError> {
        let post = match self.authorize_edit(requester, post_id).await? {
            Ok(post) => post,
            Err(forbidden) => return Ok(forbidden),
        };

        let form = self
            .bind(PostInput::from_post(&post), FormErrors::default())
            .await?;

        Ok(EditOutcome::Form(PostFormContext {
            form,
            is_edit: true,
            post: Some(self.cards.one(post).await?),
        }))
    }

    pub async fn edit(
        &self,
        requester: Option<UserId>,
        post_id: PostId,
        input: PostInput,
    ) -> Result<EditOutcome, DomainError> {
        let mut post = match self.authorize_edit(requester, post_id).await? {
            Ok(post) => post,
            Err(forbidden) => return Ok(forbidden),
        };
        let choices = self.groups.find_all().await?;

        match input.validate(&choices) {
            Ok(draft) => {
                post.apply(draft);
                Ok(EditOutcome::Updated(self.posts.update(post).await?))
            }
            Err(errors) => Ok(EditOutcome::Invalid(PostFormContext {
                form: BoundPostForm {
                    data: input,
                    errors,
                    choices,
                },
                is_edit: true,
                post: Some(self.cards.one(post).await?),
            })),
        }
    }

    /// Resolve the requester before any input is read.
    pub async fn authenticate(&self, requester: Option<UserId>) -> Result<User, DomainError> {
        let id = requester.ok_or(DomainError::Unauthenticated)?;
        // A session for a user that no longer resolves counts as anonymous.
        self.users
            .find_by_id(id)
            .await?
            .ok_or(DomainError::Unauthenticated)
    }

    /// The outcome to answer with instead of editing, or `None` when the
    /// requester is the post's author.
    pub async fn edit_refusal(
        &self,
        requester: Option<UserId>,
        post_id: PostId,
    ) -> Result<Option<EditOutcome>, DomainError> {
        Ok(self.authorize_edit(requester, post_id).await?.err())
    }

    /// Inner `Err` carries the forbidden outcome for non-authors.
    async fn authorize_edit(
        &self,
        requester: Option<UserId>,
        post_id: PostId,
    ) -> Result<Result<Post, EditOutcome>, DomainError> {
        let requester = self.authenticate(requester).await?;
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        if !post.is_authored_by(requester.id) {
            return Ok(Err(EditOutcome::Forbidden { post_id: post.id }));
        }
        Ok(Ok(post))
    }

    async fn bind(&self, data: PostInput, errors: FormErrors) -> Result<BoundPostForm, DomainError> {
        Ok(BoundPostForm {
            data,
            errors,
            choices: self.groups.find_all().await?,
        })
    }
}
