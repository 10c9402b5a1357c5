//! Domain error model.

use thiserror::Error;

/// Domain-level error.
///
/// Keep this focused on deterministic input failures (validation, malformed
/// identities). Collaborator failures belong to the directory crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A caller identity did not have the `<platform>:<user-id>` shape.
    #[error("malformed caller identity: {0}")]
    MalformedIdentity(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn malformed_identity(msg: impl Into<String>) -> Self {
        Self::MalformedIdentity(msg.into())
    }
}
