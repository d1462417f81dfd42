mod common;

use std::sync::Arc;

use common::Store;
use yatube_core::ports::{TokenService, UserRepository};
use yatube_core::services::accounts::{LoginInput, SignupInput};
use yatube_core::services::{AccountService, LoginOutcome, SignupOutcome};
use yatube_infra::{Argon2PasswordService, JwtConfig, JwtTokenService};

fn accounts(store: &Store) -> (AccountService, Arc<JwtTokenService>) {
    let tokens = Arc::new(JwtTokenService::new(JwtConfig::default()));
    let service = AccountService::new(
        store.users.clone(),
        Arc::new(Argon2PasswordService::new()),
        tokens.clone(),
    );
    (service, tokens)
}

fn signup(username: &str, password1: &str, password2: &str) -> SignupInput {
    SignupInput {
        username: username.to_string(),
        password1: password1.to_string(),
        password2: password2.to_string(),
    }
}

#[tokio::test]
async fn test_signup_then_login() {
    let store = Store::new();
    let (accounts, tokens) = accounts(&store);

    let outcome = accounts
        .signup(signup("leo", "s3cret-pass", "s3cret-pass"))
        .await
        .unwrap();
    let SignupOutcome::Registered(user) = outcome else {
        panic!("expected registration");
    };
    assert_ne!(user.password_hash, "s3cret-pass");

    let outcome = accounts
        .login(LoginInput {
            username: "leo".into(),
            password: "s3cret-pass".into(),
            next: Some("/create/".into()),
        })
        .await
        .unwrap();
    let LoginOutcome::LoggedIn { user: logged, token, next } = outcome else {
        panic!("expected login");
    };
    assert_eq!(logged.id, user.id);
    assert_eq!(next, "/create/");
    assert_eq!(tokens.validate_token(&token).unwrap().user_id, user.id);
}

#[tokio::test]
async fn test_signup_password_mismatch() {
    let store = Store::new();
    let (accounts, _) = accounts(&store);

    let outcome = accounts
        .signup(signup("leo", "s3cret-pass", "other-pass"))
        .await
        .unwrap();

    assert!(matches!(outcome, SignupOutcome::Invalid(form) if form.errors.has("password2")));
    assert!(store.users.find_by_username("leo").await.unwrap().is_none());
}

#[tokio::test]
async fn test_signup_duplicate_username() {
    let store = Store::new();
    store.user("leo").await;
    let (accounts, _) = accounts(&store);

    let outcome = accounts
        .signup(signup("leo", "s3cret-pass", "s3cret-pass"))
        .await
        .unwrap();

    assert!(matches!(outcome, SignupOutcome::Invalid(form) if form.errors.has("username")));
}

#[tokio::test]
async fn test_login_wrong_password() {
    let store = Store::new();
    let (accounts, _) = accounts(&store);
    accounts
        .signup(signup("leo", "s3cret-pass", "s3cret-pass"))
        .await
        .unwrap();

    let outcome = accounts
        .login(LoginInput {
            username: "leo".into(),
            password: "wrong-pass".into(),
            next: Some("https://evil.example".into()),
        })
        .await
        .unwrap();

    let LoginOutcome::Invalid(form) = outcome else {
        panic!("expected a rejected login");
    };
    assert!(form.errors.has("__all__"));
    assert_eq!(form.next.as_deref(), Some("/"));
}
