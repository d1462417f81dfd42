//! Urlencoded post form decoding.
//!
//! Post forms repeat the `groups` key once per selected group, so they are
//! received as raw pairs instead of a struct. Handlers read the body as bytes
//! and decode it only after the requester has been checked.

use yatube_core::services::PostInput;

/// Decode a post form body. A body that is not URL-encoded decodes to an
/// empty form and is then rejected by validation.
pub fn decode_post_body(body: &[u8]) -> PostInput {
    match serde_urlencoded::from_bytes::<Vec<(String, String)>>(body) {
        Ok(fields) => post_input(fields),
        Err(e) => {
            tracing::debug!("Undecodable post form body: {}", e);
            PostInput::default()
        }
    }
}

/// Collect `text`, `group` and the repeated `groups` fields.
/// An empty `group` means "no group".
pub fn post_input(fields: Vec<(String, String)>) -> PostInput {
    let mut input = PostInput::default();

    for (name, value) in fields {
        match name.as_str() {
            "text" => input.text = value,
            "group" => {
                input.group = Some(value).filter(|v| !v.trim().is_empty());
            }
            "groups" if !value.trim().is_empty() => input.groups.push(value),
            _ => {}
        }
    }

    input
}
