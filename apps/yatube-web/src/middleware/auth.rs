//! Session identity extractor.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};

use yatube_core::domain::UserId;
use yatube_core::ports::TokenClaims;

use crate::state::AppState;

/// Cookie carrying the signed session token.
pub const SESSION_COOKIE: &str = "yatube_session";

/// The requester behind a valid session token.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

/// Optional identity extractor - never fails, anonymous requests get `None`.
///
/// The token is read from the session cookie, or from an
/// `Authorization: Bearer` header when no cookie is present.
#[derive(Debug, Clone, Default)]
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn user_id(&self) -> Option<UserId> {
        self.0.as_ref().map(|identity| identity.user_id)
    }

    pub fn username(&self) -> Option<&str> {
        self.0.as_ref().map(|identity| identity.username.as_str())
    }
}

fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(token) = session_token(req) else {
            return ready(Ok(Self(None)));
        };

        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            tracing::error!("AppState not found in app data");
            return ready(Ok(Self(None)));
        };

        match state.tokens.validate_token(&token) {
            Ok(claims) => ready(Ok(Self(Some(Identity::from(claims))))),
            Err(e) => {
                tracing::debug!("Ignoring session token: {}", e);
                ready(Ok(Self(None)))
            }
        }
    }
}
