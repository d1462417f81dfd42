//! Account handlers: signup, login and logout.

use actix_web::{
    HttpResponse,
    cookie::{Cookie, SameSite, time::Duration},
    web,
};
use serde::{Deserialize, Serialize};

use yatube_core::services::accounts::{AccountForm, LoginInput, SignupInput, safe_next};
use yatube_core::services::{LoginOutcome, SignupOutcome};

use super::{html, redirect};
use crate::middleware::auth::{OptionalIdentity, SESSION_COOKIE};
use crate::middleware::error::{AppResult, LOGIN_URL};
use crate::state::AppState;

const SIGNUP_TITLE: &str = "Зарегистрироваться";
const LOGIN_TITLE: &str = "Войти";

#[derive(Serialize)]
struct AccountPage<'a> {
    title: &'a str,
    form: &'a AccountForm,
}

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    next: Option<String>,
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(state.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(state.tokens.expiration_seconds()))
        .finish()
}

/// GET /auth/signup/
pub async fn signup_form(identity: OptionalIdentity) -> AppResult<HttpResponse> {
    let form = AccountForm::default();
    html(
        "users/signup.html",
        &AccountPage {
            title: SIGNUP_TITLE,
            form: &form,
        },
        &identity,
    )
}

/// POST /auth/signup/
pub async fn signup(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: web::Form<SignupInput>,
) -> AppResult<HttpResponse> {
    match state.accounts.signup(body.into_inner()).await? {
        SignupOutcome::Registered(user) => {
            tracing::info!(username = %user.username, "User registered");
            Ok(redirect(LOGIN_URL))
        }
        SignupOutcome::Invalid(form) => html(
            "users/signup.html",
            &AccountPage {
                title: SIGNUP_TITLE,
                form: &form,
            },
            &identity,
        ),
    }
}

/// GET /auth/login/
pub async fn login_form(
    identity: OptionalIdentity,
    query: web::Query<NextQuery>,
) -> AppResult<HttpResponse> {
    let form = AccountForm {
        next: Some(safe_next(query.next.as_deref())),
        ..AccountForm::default()
    };

    html(
        "users/login.html",
        &AccountPage {
            title: LOGIN_TITLE,
            form: &form,
        },
        &identity,
    )
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: web::Form<LoginInput>,
) -> AppResult<HttpResponse> {
    match state.accounts.login(body.into_inner()).await? {
        LoginOutcome::LoggedIn { user, token, next } => {
            tracing::info!(username = %user.username, "User logged in");
            Ok(HttpResponse::Found()
                .insert_header((actix_web::http::header::LOCATION, next))
                .cookie(session_cookie(&state, token))
                .finish())
        }
        LoginOutcome::Invalid(form) => html(
            "users/login.html",
            &AccountPage {
                title: LOGIN_TITLE,
                form: &form,
            },
            &identity,
        ),
    }
}

/// GET /auth/logout/
pub async fn logout() -> AppResult<HttpResponse> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();

    let body = crate::templates::render_page(
        "users/logged_out.html",
        &AccountPage {
            title: "Вы вышли из системы",
            form: &AccountForm::default(),
        },
        None,
    )?;

    Ok(HttpResponse::Ok()
        .content_type(actix_web::http::header::ContentType::html())
        .cookie(cookie)
        .body(body))
}
