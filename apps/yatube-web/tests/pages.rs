#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use common::{TestContext, body_text};
use yatube_core::services::GroupFeedScope;
use yatube_web::config::AppConfig;
use yatube_web::observability::REQUEST_ID_HEADER;

const CARD_LINK: &str = "подробная информация";

#[actix_web::test]
async fn test_public_pages_render() {
    let ctx = TestContext::new();
    let author = ctx.user("auth").await;
    let group = ctx.group("test", "Тестовая группа").await;
    let post = ctx.post(&author, "Тестовый текст", Some(&group)).await;
    let app = app!(ctx);

    for uri in ["/", "/group/test/", "/profile/auth/"] {
        let resp = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        assert!(body_text(resp).await.contains("Тестовый текст"), "{uri}");
    }

    let uri = format!("/posts/{}/", post.id);
    let resp = test::call_service(&app, TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("Тестовый текст"));
    assert!(body.contains("Тестовая группа"));
    assert!(body.contains("Пост: Тестовый текст"));
}

#[actix_web::test]
async fn test_unknown_pages_are_not_found() {
    let ctx = TestContext::new();
    let author = ctx.user("auth").await;
    ctx.post(&author, "Тестовый текст", None).await;
    let app = app!(ctx);

    for uri in [
        "/posts/999/",
        "/posts/abc/",
        "/group/not_found_group/",
        "/profile/not_found_user/",
        "/unexisting_page/",
    ] {
        let resp = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        assert!(body_text(resp).await.contains("Страница не найдена"), "{uri}");
    }
}

#[actix_web::test]
async fn test_index_pagination() {
    let ctx = TestContext::new();
    let author = ctx.user("auth").await;
    for i in 1..=13 {
        ctx.post(&author, &format!("post {i}"), None).await;
    }
    let app = app!(ctx);

    for (uri, cards) in [
        ("/", 10),
        ("/?page=1", 10),
        ("/?page=2", 3),
        ("/?page=0", 10),
        ("/?page=abc", 10),
        ("/?page=99", 3),
    ] {
        let resp = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        assert_eq!(body_text(resp).await.matches(CARD_LINK).count(), cards, "{uri}");
    }
}

#[actix_web::test]
async fn test_profile_lists_newest_first() {
    let ctx = TestContext::new();
    let author = ctx.user("auth").await;
    ctx.post(&author, "older post", None).await;
    ctx.post(&author, "newer post", None).await;
    let app = app!(ctx);

    let resp = test::call_service(&app, TestRequest::get().uri("/profile/auth/").to_request()).await;
    let body = body_text(resp).await;

    let newer = body.find("newer post").unwrap();
    let older = body.find("older post").unwrap();
    assert!(newer < older);
    assert!(body.contains("Всего постов: 2"));
}

#[actix_web::test]
async fn test_group_page_scoped_feed() {
    let ctx = TestContext::with_config(AppConfig {
        group_feed_scope: GroupFeedScope::Group,
        ..AppConfig::default()
    });
    let author = ctx.user("auth").await;
    let test_group = ctx.group("test", "Тестовая группа").await;
    let other = ctx.group("new_group", "Новая группа").await;
    ctx.post(&author, "Тестовый текст", Some(&test_group)).await;
    ctx.post(&author, "Текст нового поста", Some(&other)).await;
    let app = app!(ctx);

    let resp = test::call_service(&app, TestRequest::get().uri("/group/test/").to_request()).await;
    let body = body_text(resp).await;

    assert!(body.contains("Тестовый текст"));
    assert!(!body.contains("Текст нового поста"));
}

#[actix_web::test]
async fn test_health() {
    let ctx = TestContext::new();
    let app = app!(ctx);

    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
    assert_eq!(body_text(resp).await, "ok");
}

#[actix_web::test]
async fn test_request_id_is_echoed() {
    let ctx = TestContext::new();
    let app = app!(ctx);

    let req = TestRequest::get()
        .uri("/health")
        .insert_header((REQUEST_ID_HEADER, "req-42"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "req-42");
}
