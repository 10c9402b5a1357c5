//! Collaborator boundary: the resource directory and the chat platform.
//!
//! Both collaborators own their state; the bot only reaches them through the
//! async request/response traits defined here. In-memory implementations back
//! tests and the dev console.

pub mod directory;
pub mod error;
pub mod in_memory;
pub mod platform;
pub mod records;

pub use directory::ResourceDirectory;
pub use error::{RemoteError, RemoteResult};
pub use in_memory::{InMemoryDirectory, InMemoryPlatform};
pub use platform::ChatPlatform;
pub use records::{
    DEFAULT_ROLE_KIND, Filter, PlatformRole, Role, RoleKey, Rule, WILDCARD_FILTER,
};
