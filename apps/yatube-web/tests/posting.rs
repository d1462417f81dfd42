#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use common::{TestContext, body_text, location};

#[actix_web::test]
async fn test_anonymous_create_redirects_to_login() {
    let ctx = TestContext::new();
    let app = app!(ctx);

    let resp = test::call_service(&app, TestRequest::get().uri("/create/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=/create/");

    let req = TestRequest::post()
        .uri("/create/")
        .set_form([("text", "Тестовый текст")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=/create/");
    assert_eq!(ctx.post_count().await, 0);
}

#[actix_web::test]
async fn test_anonymous_edit_redirects_to_login() {
    let ctx = TestContext::new();
    let author = ctx.user("auth").await;
    let post = ctx.post(&author, "Тестовый текст", None).await;
    let app = app!(ctx);

    let uri = format!("/posts/{}/edit/", post.id);
    let resp = test::call_service(&app, TestRequest::get().uri(&uri).to_request()).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/auth/login/?next={uri}"));
}

#[actix_web::test]
async fn test_create_form_renders_for_user() {
    let ctx = TestContext::new();
    let author = ctx.user("auth").await;
    ctx.group("test", "Тестовая группа").await;
    let app = app!(ctx);

    let req = TestRequest::get()
        .uri("/create/")
        .cookie(ctx.session(&author))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("Новый пост"));
    assert!(body.contains("Тестовая группа"));
}

#[actix_web::test]
async fn test_create_then_view() {
    let ctx = TestContext::new();
    let author = ctx.user("auth").await;
    let group = ctx.group("test", "Тестовая группа").await;
    let app = app!(ctx);

    let group_id = group.id.to_string();
    let req = TestRequest::post()
        .uri("/create/")
        .cookie(ctx.session(&author))
        .set_form([("text", "Тестовый текст"), ("group", group_id.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/auth/");
    assert_eq!(ctx.post_count().await, 1);

    let resp = test::call_service(&app, TestRequest::get().uri("/posts/1/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("Тестовый текст"));
    assert!(body.contains("Тестовая группа"));
}

#[actix_web::test]
async fn test_create_rejects_blank_text() {
    let ctx = TestContext::new();
    let author = ctx.user("auth").await;
    let app = app!(ctx);

    let req = TestRequest::post()
        .uri("/create/")
        .cookie(ctx.session(&author))
        .set_form([("text", "   "), ("group", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Обязательное поле."));
    assert_eq!(ctx.post_count().await, 0);
}

#[actix_web::test]
async fn test_author_edits_post() {
    let ctx = TestContext::new();
    let author = ctx.user("auth").await;
    let post = ctx.post(&author, "Тестовый текст", None).await;
    let app = app!(ctx);
    let uri = format!("/posts/{}/edit/", post.id);

    let req = TestRequest::get()
        .uri(&uri)
        .cookie(ctx.session(&author))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Тестовый текст"));

    let req = TestRequest::post()
        .uri(&uri)
        .cookie(ctx.session(&author))
        .set_form([("text", "Изменённый текст")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));

    let stored = ctx.stored(&post).await;
    assert_eq!(stored.text, "Изменённый текст");
    assert_eq!(stored.author_id, author.id);
}

#[actix_web::test]
async fn test_non_author_is_sent_to_detail() {
    let ctx = TestContext::new();
    let author = ctx.user("auth").await;
    let intruder = ctx.user("HasNoName").await;
    let post = ctx.post(&author, "Тестовый текст", None).await;
    let app = app!(ctx);
    let uri = format!("/posts/{}/edit/", post.id);
    let detail = format!("/posts/{}/", post.id);

    let req = TestRequest::get()
        .uri(&uri)
        .cookie(ctx.session(&intruder))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), detail);

    let req = TestRequest::post()
        .uri(&uri)
        .cookie(ctx.session(&intruder))
        .set_form([("text", "Взлом")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), detail);

    assert_eq!(ctx.stored(&post).await.text, "Тестовый текст");
}

#[actix_web::test]
async fn test_edit_unknown_post_is_not_found() {
    let ctx = TestContext::new();
    let author = ctx.user("auth").await;
    let app = app!(ctx);

    let req = TestRequest::get()
        .uri("/posts/999/edit/")
        .cookie(ctx.session(&author))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_anonymous_create_redirects_for_any_body() {
    let ctx = TestContext::new();
    let app = app!(ctx);

    let requests = [
        TestRequest::post().uri("/create/").to_request(),
        TestRequest::post()
            .uri("/create/")
            .insert_header(("content-type", "multipart/form-data; boundary=x"))
            .set_payload("--x--")
            .to_request(),
    ];
    for req in requests {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), "/auth/login/?next=/create/");
    }
    assert_eq!(ctx.post_count().await, 0);
}

#[actix_web::test]
async fn test_non_author_plain_text_edit_is_sent_to_detail() {
    let ctx = TestContext::new();
    let author = ctx.user("auth").await;
    let intruder = ctx.user("HasNoName").await;
    let post = ctx.post(&author, "Тестовый текст", None).await;
    let app = app!(ctx);

    let req = TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .cookie(ctx.session(&intruder))
        .insert_header(("content-type", "text/plain"))
        .set_payload("text=Взлом")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));
    assert_eq!(ctx.stored(&post).await.text, "Тестовый текст");
}

#[actix_web::test]
async fn test_create_accepts_long_text() {
    let ctx = TestContext::new();
    let author = ctx.user("auth").await;
    let app = app!(ctx);
    let text = "x".repeat(40_000);

    let req = TestRequest::post()
        .uri("/create/")
        .cookie(ctx.session(&author))
        .set_form([("text", text.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/auth/");
    assert_eq!(ctx.post_count().await, 1);
}
