//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;

use actix_web::{HttpRequest, HttpResponse, http::header, web};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Serialize;

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::templates;

/// Bytes escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Largest accepted request body. Post text itself is unbounded.
pub const BODY_LIMIT: usize = 4 * 1024 * 1024;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(BODY_LIMIT))
        .app_data(web::FormConfig::default().limit(BODY_LIMIT))
        .route("/", web::get().to(posts::index))
        .route("/group/{slug}/", web::get().to(posts::group_posts))
        .route("/profile/{username}/", web::get().to(posts::profile))
        .route("/posts/{post_id}/", web::get().to(posts::post_detail))
        .service(
            web::resource("/create/")
                .route(web::get().to(posts::create_form))
                .route(web::post().to(posts::create)),
        )
        .service(
            web::resource("/posts/{post_id}/edit/")
                .route(web::get().to(posts::edit_form))
                .route(web::post().to(posts::edit)),
        )
        .service(
            web::scope("/auth")
                .service(
                    web::resource("/signup/")
                        .route(web::get().to(auth::signup_form))
                        .route(web::post().to(auth::signup)),
                )
                .service(
                    web::resource("/login/")
                        .route(web::get().to(auth::login_form))
                        .route(web::post().to(auth::login)),
                )
                .route("/logout/", web::get().to(auth::logout)),
        )
        .route("/health", web::get().to(health::health_check));
}

/// Fallback for unmatched routes; register with `App::default_service`.
pub async fn not_found(req: HttpRequest) -> AppResult<HttpResponse> {
    Err(AppError::NotFound(format!("no route for {}", req.path())))
}

/// 200 with a rendered page.
fn html<T: Serialize>(
    template: &str,
    page: &T,
    identity: &OptionalIdentity,
) -> AppResult<HttpResponse> {
    let body = templates::render_page(template, page, identity.username())?;

    Ok(HttpResponse::Ok()
        .content_type(header::ContentType::html())
        .body(body))
}

fn redirect(location: impl Into<String>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.into()))
        .finish()
}

fn profile_url(username: &str) -> String {
    format!("/profile/{}/", utf8_percent_encode(username, PATH_SEGMENT))
}

/// Path and query of the current request, used as the login `next`.
fn current_path(req: &HttpRequest) -> &str {
    req.uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| req.path())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_url_escapes_segment() {
        assert_eq!(profile_url("auth"), "/profile/auth/");
        assert_eq!(profile_url("leo.b+1@x"), "/profile/leo.b+1@x/");
        assert_eq!(profile_url("Лев"), "/profile/%D0%9B%D0%B5%D0%B2/");
    }
}
