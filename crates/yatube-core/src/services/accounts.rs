//! Registration and login.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::form::{FormErrors, REQUIRED_MESSAGE};
use crate::domain::User;
use crate::error::{DomainError, RepoError};
use crate::ports::{PasswordService, TokenService, UserRepository};

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_USERNAME_LENGTH: usize = 150;

const DUPLICATE_USERNAME: &str = "Пользователь с таким именем уже существует.";
const INVALID_USERNAME: &str = "Введите правильное имя пользователя. Оно может содержать только буквы, цифры и знаки @/./+/-/_.";
const PASSWORD_MISMATCH: &str = "Введенные пароли не совпадают.";
const PASSWORD_TOO_SHORT: &str =
    "Введённый пароль слишком короткий. Он должен содержать как минимум 8 символов.";
const INVALID_LOGIN: &str = "Пожалуйста, введите правильные имя пользователя и пароль. Оба поля могут быть чувствительны к регистру.";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupInput {
    pub username: String,
    pub password1: String,
    pub password2: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

/// Login or signup form as rendered back. Passwords are never echoed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AccountForm {
    pub username: String,
    pub errors: FormErrors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

#[derive(Debug)]
pub enum SignupOutcome {
    Registered(User),
    Invalid(AccountForm),
}

#[derive(Debug)]
pub enum LoginOutcome {
    LoggedIn {
        user: User,
        token: String,
        next: String,
    },
    Invalid(AccountForm),
}

/// Only same-site absolute paths are followed after login. Browsers drop
/// tabs and newlines from URLs, so any control character is refused.
pub fn safe_next(next: Option<&str>) -> String {
    match next.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path.to_string()
        }
        _ => "/".to_string(),
    }
}

pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    pub async fn signup(&self, input: SignupInput) -> Result<SignupOutcome, DomainError> {
        let username = input.username.trim().to_string();
        let mut errors = FormErrors::default();

        if username.is_empty() {
            errors.add("username", REQUIRED_MESSAGE);
        } else if !is_valid_username(&username) {
            errors.add("username", INVALID_USERNAME);
        } else if self.users.find_by_username(&username).await?.is_some() {
            errors.add("username", DUPLICATE_USERNAME);
        }

        if input.password1.is_empty() {
            errors.add("password1", REQUIRED_MESSAGE);
        }
        if input.password2.is_empty() {
            errors.add("password2", REQUIRED_MESSAGE);
        }
        if !input.password1.is_empty() && !input.password2.is_empty() {
            if input.password1 != input.password2 {
                errors.add("password2", PASSWORD_MISMATCH);
            } else if input.password1.chars().count() < MIN_PASSWORD_LENGTH {
                errors.add("password2", PASSWORD_TOO_SHORT);
            }
        }

        if !errors.is_empty() {
            return Ok(SignupOutcome::Invalid(AccountForm {
                username,
                errors,
                next: None,
            }));
        }

        let password_hash = self
            .passwords
            .hash(&input.password1)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        match self.users.insert(User::new(username.clone(), password_hash)).await {
            Ok(user) => Ok(SignupOutcome::Registered(user)),
            Err(RepoError::Constraint(_)) => {
                let mut errors = FormErrors::default();
                errors.add("username", DUPLICATE_USERNAME);
                Ok(SignupOutcome::Invalid(AccountForm {
                    username,
                    errors,
                    next: None,
                }))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn login(&self, input: LoginInput) -> Result<LoginOutcome, DomainError> {
        let username = input.username.trim().to_string();
        let next = safe_next(input.next.as_deref());
        let mut errors = FormErrors::default();

        if username.is_empty() {
            errors.add("username", REQUIRED_MESSAGE);
        }
        if input.password.is_empty() {
            errors.add("password", REQUIRED_MESSAGE);
        }

        if errors.is_empty() {
            if let Some(user) = self.users.find_by_username(&username).await? {
                let valid = self
                    .passwords
                    .verify(&input.password, &user.password_hash)
                    .map_err(|e| DomainError::Internal(e.to_string()))?;

                if valid {
                    let token = self
                        .tokens
                        .generate_token(user.id, &user.username)
                        .map_err(|e| DomainError::Internal(e.to_string()))?;
                    return Ok(LoginOutcome::LoggedIn { user, token, next });
                }
            }
            errors.add(FormErrors::NON_FIELD, INVALID_LOGIN);
        }

        Ok(LoginOutcome::Invalid(AccountForm {
            username,
            errors,
            next: Some(next),
        }))
    }
}

fn is_valid_username(username: &str) -> bool {
    username.chars().count() <= MAX_USERNAME_LENGTH
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next_keeps_local_paths() {
        assert_eq!(safe_next(Some("/create/")), "/create/");
        assert_eq!(safe_next(Some("/posts/1/edit/?page=2")), "/posts/1/edit/?page=2");
    }

    #[test]
    fn test_safe_next_rejects_foreign_targets() {
        for next in [
            None,
            Some(""),
            Some("https://evil.example"),
            Some("//evil.example"),
            Some("/\t/evil.example"),
            Some("/\n/evil.example"),
            Some("/\r/evil.example"),
            Some("/\\evil.example"),
        ] {
            assert_eq!(safe_next(next), "/");
        }
    }

    #[test]
    fn test_username_charset() {
        assert!(is_valid_username("StasBasov"));
        assert!(is_valid_username("user.name+tag@site_1-2"));
        assert!(!is_valid_username("with space"));
        assert!(!is_valid_username(&"a".repeat(MAX_USERNAME_LENGTH + 1)));
    }
}
