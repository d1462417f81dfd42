//! Error handling middleware - rendered error pages and login redirects.

use actix_web::{
    HttpResponse, ResponseError,
    http::{StatusCode, header},
};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;

use yatube_core::DomainError;

use crate::templates;

pub const LOGIN_URL: &str = "/auth/login/";

/// Characters left as-is in the `next` query value.
const NEXT_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Application-level error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// The requester must log in first; `next` is the path to come back to.
    #[error("Login required for {next}")]
    LoginRequired { next: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Map a use-case error, sending anonymous requesters to the login page.
    pub fn from_domain(err: DomainError, next: &str) -> Self {
        match err {
            DomainError::Unauthenticated => AppError::LoginRequired {
                next: next.to_string(),
            },
            other => other.into(),
        }
    }
}

/// `/auth/login/?next=<next>` with `next` percent-encoded.
pub fn login_url(next: &str) -> String {
    format!("{LOGIN_URL}?next={}", utf8_percent_encode(next, NEXT_VALUE))
}

#[derive(Serialize)]
struct ErrorPage<'a> {
    title: &'a str,
}

fn error_page(status: StatusCode, template: &str, page: &ErrorPage<'_>) -> HttpResponse {
    let body = tera::Context::from_serialize(page)
        .and_then(|mut context| {
            context.insert("current_user", &Option::<String>::None);
            templates::render(template, &context)
        })
        .unwrap_or_else(|e| {
            tracing::error!("Failed to render {}: {}", template, e);
            page.title.to_string()
        });

    HttpResponse::build(status)
        .content_type(header::ContentType::html())
        .body(body)
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::LoginRequired { .. } => StatusCode::FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound(detail) => {
                tracing::debug!("Not found: {}", detail);
                error_page(
                    self.status_code(),
                    "core/404.html",
                    &ErrorPage {
                        title: "Страница не найдена",
                    },
                )
            }
            AppError::LoginRequired { next } => HttpResponse::Found()
                .insert_header((header::LOCATION, login_url(next)))
                .finish(),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                error_page(
                    self.status_code(),
                    "core/500.html",
                    &ErrorPage {
                        title: "Ошибка сервера",
                    },
                )
            }
        }
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{} {} not found", entity_type, key))
            }
            DomainError::Unauthenticated => AppError::LoginRequired {
                next: "/".to_string(),
            },
            // Services report form errors and taken names as outcomes, so
            // these only surface from a store invariant being broken.
            DomainError::Validation(msg) => {
                tracing::debug!("Validation error escaped to a handler: {}", msg);
                AppError::Internal(msg)
            }
            DomainError::Duplicate(msg) => {
                tracing::debug!("Duplicate error escaped to a handler: {}", msg);
                AppError::Internal(msg)
            }
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<tera::Error> for AppError {
    fn from(err: tera::Error) -> Self {
        AppError::Internal(format!("template error: {err:?}"))
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url_keeps_slashes() {
        assert_eq!(login_url("/create/"), "/auth/login/?next=/create/");
    }

    #[test]
    fn test_login_url_encodes_query() {
        assert_eq!(
            login_url("/posts/1/edit/?page=2"),
            "/auth/login/?next=/posts/1/edit/%3Fpage%3D2"
        );
    }

    #[test]
    fn test_unauthenticated_maps_to_login() {
        let err = AppError::from_domain(DomainError::Unauthenticated, "/create/");
        assert!(matches!(err, AppError::LoginRequired { ref next } if next == "/create/"));
        assert_eq!(err.status_code(), StatusCode::FOUND);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = AppError::from(DomainError::not_found("group", "missing"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_escaped_form_errors_are_server_errors() {
        let err = AppError::from(DomainError::Validation("text".into()));
        assert!(matches!(err, AppError::Internal(ref msg) if msg == "text"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = AppError::from(DomainError::Duplicate("username".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
