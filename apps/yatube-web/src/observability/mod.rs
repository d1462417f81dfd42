//! Observability module - request IDs and their tracing spans.

mod request_id;

pub use request_id::{REQUEST_ID_HEADER, RequestIdMiddleware};
