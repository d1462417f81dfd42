//! Embedded tera templates.

use std::sync::LazyLock;

use serde::Serialize;
use tera::{Context, Tera};

macro_rules! embed {
    ($($name:literal),+ $(,)?) => {
        [$(($name, include_str!(concat!("../templates/", $name)))),+]
    };
}

static TEMPLATES: LazyLock<Result<Tera, tera::Error>> = LazyLock::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(embed![
        "base.html",
        "includes/paginator.html",
        "includes/post_card.html",
        "posts/index.html",
        "posts/group_list.html",
        "posts/profile.html",
        "posts/post_detail.html",
        "posts/create_post.html",
        "users/signup.html",
        "users/login.html",
        "users/logged_out.html",
        "core/404.html",
        "core/500.html",
    ])?;
    Ok(tera)
});

/// Render a template by name.
pub fn render(name: &str, context: &Context) -> Result<String, tera::Error> {
    match &*TEMPLATES {
        Ok(tera) => tera.render(name, context),
        Err(e) => Err(tera::Error::msg(format!("templates failed to load: {e}"))),
    }
}

/// Render a page context; `current_user` is added for the layout.
pub fn render_page<T: Serialize>(
    name: &str,
    page: &T,
    current_user: Option<&str>,
) -> Result<String, tera::Error> {
    let mut context = Context::from_serialize(page)?;
    context.insert("current_user", &current_user);
    render(name, &context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_load() {
        if let Err(e) = &*TEMPLATES {
            panic!("templates failed to load: {e:?}");
        }
    }

    #[test]
    fn test_error_page_renders() {
        let mut context = Context::new();
        context.insert("title", "Страница не найдена");
        context.insert("current_user", &Option::<String>::None);

        let html = render("core/404.html", &context).unwrap();
        assert!(html.contains("Страница не найдена"));
    }
}
