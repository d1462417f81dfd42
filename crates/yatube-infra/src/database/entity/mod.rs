//! SeaORM entities.

pub mod group;
pub mod post;
pub mod post_group;
pub mod user;
