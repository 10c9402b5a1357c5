use thiserror::Error;

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Collaborator call failure.
///
/// Collaborators report a structured kind so callers can branch on it (e.g. the
/// reconciliation engine swallows [`RemoteError::AlreadyExists`]) instead of
/// matching on another system's prose.
///
/// ## Error Categories
///
/// - **AlreadyExists**: the record being created is already present
/// - **NotFound**: the addressed record does not exist
/// - **Invalid**: the collaborator rejected the request shape
/// - **Transport**: the call itself failed (unavailable, timeout, decode)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid request: {0}")]
    Invalid(String),

    #[error("{0}")]
    Transport(String),
}

impl RemoteError {
    pub fn already_exists(what: impl Into<String>) -> Self {
        Self::AlreadyExists(what.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }
}
