//! Post form validation.

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Group, GroupId, Post, PostDraft};

pub const REQUIRED_MESSAGE: &str = "Обязательное поле.";
pub const INVALID_CHOICE_MESSAGE: &str =
    "Выберите корректный вариант. Вашего варианта нет среди допустимых значений.";

/// Field name to error messages. `__all__` holds form-wide errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub const NON_FIELD: &'static str = "__all__";

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Raw post form fields as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PostInput {
    pub text: String,
    pub group: Option<String>,
    pub groups: Vec<String>,
}

impl PostInput {
    /// Prefill a form from an existing post.
    pub fn from_post(post: &Post) -> Self {
        Self {
            text: post.text.clone(),
            group: post.group_id.map(|id| id.to_string()),
            groups: post.groups.iter().map(ToString::to_string).collect(),
        }
    }

    /// Validate against the available group choices.
    pub fn validate(&self, choices: &[Group]) -> Result<PostDraft, FormErrors> {
        let mut errors = FormErrors::default();

        let text = self.text.trim();
        if text.is_empty() {
            errors.add("text", REQUIRED_MESSAGE);
        }

        let group_id = match self.group.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match resolve_choice(raw, choices) {
                Some(id) => Some(id),
                None => {
                    errors.add("group", INVALID_CHOICE_MESSAGE);
                    None
                }
            },
        };

        let mut groups: Vec<GroupId> = Vec::new();
        for raw in self.groups.iter().map(|raw| raw.trim()).filter(|raw| !raw.is_empty()) {
            match resolve_choice(raw, choices) {
                Some(id) if !groups.contains(&id) => groups.push(id),
                Some(_) => {}
                None => errors.add(
                    "groups",
                    format!("Выберите корректный вариант. {raw} нет среди допустимых значений."),
                ),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(PostDraft {
            text: text.to_string(),
            group_id,
            groups,
        })
    }
}

fn resolve_choice(raw: &str, choices: &[Group]) -> Option<GroupId> {
    let id = Uuid::parse_str(raw).ok()?;
    choices.iter().find(|group| group.id == id).map(|group| group.id)
}
