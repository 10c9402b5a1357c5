//! `rolecall-core`: shared building blocks for the command bot.
//!
//! This crate contains **pure** primitives (no collaborator or transport concerns):
//! caller identities, name normalization and the shared validation error.

pub mod entity;
pub mod error;
pub mod id;
pub mod name;

pub use entity::Entity;
pub use error::DomainError;
pub use id::{CallerIdentity, UserId};
pub use name::{
    NAME_DELIMITER, is_user_mention, join_trailing, normalize_name, strip_paired_quotes,
};
