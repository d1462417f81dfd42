//! Health check endpoint.

use actix_web::{HttpResponse, http::header};

/// Liveness probe - returns plain `ok`.
///
/// GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(header::ContentType::plaintext())
        .body("ok")
}
