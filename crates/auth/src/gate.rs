//! Permission gate: asks the permission service whether a caller may proceed.
//!
//! This is checked at the command boundary, **before** any mutating
//! collaborator call is issued.

use std::sync::Arc;

use thiserror::Error;

use rolecall_core::{CallerIdentity, DomainError, UserId};

use crate::PermissionSet;

/// Failure reported by the permission service itself (transport or service error).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct PermissionServiceError(pub String);

impl PermissionServiceError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Remote permission decision (the permissions collaborator).
#[async_trait::async_trait]
pub trait PermissionService: Send + Sync {
    /// Whether `user` may perform an operation guarded by `required`.
    async fn can_perform(
        &self,
        user: &UserId,
        required: &PermissionSet,
    ) -> Result<bool, PermissionServiceError>;
}

#[async_trait::async_trait]
impl<S> PermissionService for Arc<S>
where
    S: PermissionService + ?Sized,
{
    async fn can_perform(
        &self,
        user: &UserId,
        required: &PermissionSet,
    ) -> Result<bool, PermissionServiceError> {
        (**self).can_perform(user, required).await
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    /// The caller identity was not of the form `<platform>:<user-id>`.
    #[error("malformed caller identity: {0}")]
    MalformedIdentity(String),

    /// The permission service could not answer; the command must be aborted.
    #[error("permission check failed: {0}")]
    PermissionCheckFailed(String),
}

impl From<DomainError> for GateError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::MalformedIdentity(msg) | DomainError::Validation(msg) => {
                GateError::MalformedIdentity(msg)
            }
        }
    }
}

/// Stateless decision function over a remote [`PermissionService`].
///
/// - `Ok(true)`: the caller may proceed
/// - `Ok(false)`: explicit denial (render as a user-facing authorization failure)
/// - `Err(_)`: the decision could not be made (abort, never retry)
#[derive(Clone)]
pub struct PermissionGate {
    service: Arc<dyn PermissionService>,
}

impl PermissionGate {
    pub fn new(service: Arc<dyn PermissionService>) -> Self {
        Self { service }
    }

    pub async fn can_perform(
        &self,
        caller: &str,
        required: &PermissionSet,
    ) -> Result<bool, GateError> {
        let caller: CallerIdentity = caller.parse()?;

        let allowed = self
            .service
            .can_perform(caller.user_id(), required)
            .await
            .map_err(|e| {
                tracing::warn!(caller = %caller, required = %required, error = %e, "permission check failed");
                GateError::PermissionCheckFailed(e.0)
            })?;

        if !allowed {
            tracing::info!(caller = %caller, required = %required, "permission denied");
        }

        Ok(allowed)
    }
}

impl core::fmt::Debug for PermissionGate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PermissionGate").finish_non_exhaustive()
    }
}
