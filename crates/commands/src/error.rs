use thiserror::Error;

use rolecall_auth::GateError;
use rolecall_core::DomainError;
use rolecall_directory::RemoteError;

use crate::reply::{Reply, Severity};

/// Why a command did not succeed.
///
/// Every variant maps to exactly one [`Severity`]; nothing here is fatal to the
/// process, the router turns each into a reply.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Wrong argument count or shape; raised before any remote call.
    #[error("{0}")]
    Usage(String),

    /// The permission service explicitly denied the caller.
    #[error("User doesn't have permission to this command")]
    Denied,

    /// The caller identity could not be parsed.
    #[error("{0}")]
    MalformedIdentity(String),

    /// The permission service could not be asked; nothing was mutated.
    #[error("{0}")]
    PermissionCheck(String),

    /// A collaborator call failed (message surfaced verbatim).
    #[error("{0}")]
    Remote(#[from] RemoteError),

    #[error("Not a valid subcommand: {0}")]
    UnknownSubcommand(String),

    #[error("Not a valid command: {0}")]
    UnknownCommand(String),
}

impl CommandError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    pub fn severity(&self) -> Severity {
        match self {
            CommandError::Usage(_)
            | CommandError::Denied
            | CommandError::MalformedIdentity(_)
            | CommandError::UnknownSubcommand(_)
            | CommandError::UnknownCommand(_) => Severity::Warning,
            CommandError::PermissionCheck(_) | CommandError::Remote(_) => Severity::Fatal,
        }
    }
}

impl From<GateError> for CommandError {
    fn from(value: GateError) -> Self {
        match value {
            GateError::MalformedIdentity(msg) => CommandError::MalformedIdentity(msg),
            GateError::PermissionCheckFailed(msg) => CommandError::PermissionCheck(msg),
        }
    }
}

impl From<DomainError> for CommandError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => CommandError::Usage(msg),
            DomainError::MalformedIdentity(msg) => CommandError::MalformedIdentity(msg),
        }
    }
}

impl From<CommandError> for Reply {
    fn from(value: CommandError) -> Self {
        Reply {
            severity: value.severity(),
            body: value.to_string(),
        }
    }
}
