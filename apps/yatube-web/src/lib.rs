//! # Yatube Web
//!
//! Server-rendered blog: public listings, post authoring and accounts on
//! actix-web, with the use cases living in `yatube-core`.

pub mod config;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;
pub mod templates;
