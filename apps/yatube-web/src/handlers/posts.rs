//! Listing and post authoring handlers.

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use yatube_core::domain::PostId;
use yatube_core::services::{CreateOutcome, EditOutcome, parse_page_number};

use super::{current_path, html, profile_url, redirect};
use crate::forms::decode_post_body;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const CREATE_TEMPLATE: &str = "posts/create_post.html";

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    page: Option<String>,
}

impl PageQuery {
    fn number(&self) -> Option<i64> {
        parse_page_number(self.page.as_deref())
    }
}

/// Non-numeric ids resolve like any other unknown post.
fn post_id(raw: &str) -> AppResult<PostId> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("post {raw} not found")))
}

fn detail_url(id: PostId) -> String {
    format!("/posts/{id}/")
}

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state.listings.index(query.number()).await?;
    html("posts/index.html", &page, &identity)
}

/// GET /group/{slug}/
pub async fn group_posts(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state.listings.group_posts(&slug, query.number()).await?;
    html("posts/group_list.html", &page, &identity)
}

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state.listings.profile(&username, query.number()).await?;
    html("posts/profile.html", &page, &identity)
}

/// GET /posts/{post_id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    raw_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let page = state.listings.post_detail(post_id(&raw_id)?).await?;
    html("posts/post_detail.html", &page, &identity)
}

/// GET /create/
pub async fn create_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let ctx = state
        .posting
        .new_post_form(identity.user_id())
        .await
        .map_err(|e| AppError::from_domain(e, current_path(&req)))?;

    html(CREATE_TEMPLATE, &ctx, &identity)
}

/// POST /create/
///
/// The body is taken raw so an anonymous requester is redirected whatever
/// was submitted.
pub async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    state
        .posting
        .authenticate(identity.user_id())
        .await
        .map_err(|e| AppError::from_domain(e, current_path(&req)))?;

    let outcome = state
        .posting
        .create(identity.user_id(), decode_post_body(&body))
        .await
        .map_err(|e| AppError::from_domain(e, current_path(&req)))?;

    match outcome {
        CreateOutcome::Created { post, author } => {
            tracing::info!(post_id = post.id, author = %author.username, "Post created");
            Ok(redirect(profile_url(&author.username)))
        }
        CreateOutcome::Invalid(ctx) => html(CREATE_TEMPLATE, &ctx, &identity),
    }
}

/// GET /posts/{post_id}/edit/
pub async fn edit_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    raw_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .posting
        .edit_form(identity.user_id(), post_id(&raw_id)?)
        .await
        .map_err(|e| AppError::from_domain(e, current_path(&req)))?;

    edit_response(outcome, &identity)
}

/// POST /posts/{post_id}/edit/
pub async fn edit(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    raw_id: web::Path<String>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let id = post_id(&raw_id)?;

    if let Some(refusal) = state
        .posting
        .edit_refusal(identity.user_id(), id)
        .await
        .map_err(|e| AppError::from_domain(e, current_path(&req)))?
    {
        return edit_response(refusal, &identity);
    }

    let outcome = state
        .posting
        .edit(identity.user_id(), id, decode_post_body(&body))
        .await
        .map_err(|e| AppError::from_domain(e, current_path(&req)))?;

    edit_response(outcome, &identity)
}

fn edit_response(outcome: EditOutcome, identity: &OptionalIdentity) -> AppResult<HttpResponse> {
    match outcome {
        EditOutcome::Form(ctx) | EditOutcome::Invalid(ctx) => html(CREATE_TEMPLATE, &ctx, identity),
        EditOutcome::Updated(post) => {
            tracing::info!(post_id = post.id, "Post updated");
            Ok(redirect(detail_url(post.id)))
        }
        EditOutcome::Forbidden { post_id } => {
            tracing::debug!(post_id, requester = ?identity.user_id(), "Edit refused for non-author");
            Ok(redirect(detail_url(post_id)))
        }
    }
}
