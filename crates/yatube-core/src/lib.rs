//! # Yatube Core
//!
//! The domain layer of Yatube.
//! Entities, repository ports, and the listing/posting rules live here with
//! zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
