//! In-memory permission service.
//!
//! Intended for tests and the dev console. A user is allowed when they hold the
//! wildcard permission or any permission of the required set (the permission
//! service answers "is this user in one of these groups").

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use rolecall_core::UserId;

use crate::{Permission, PermissionService, PermissionServiceError, PermissionSet};

#[derive(Debug, Default)]
pub struct StaticPermissions {
    grants: RwLock<HashMap<UserId, HashSet<Permission>>>,
    failure: RwLock<Option<String>>,
    calls: AtomicUsize,
}

impl StaticPermissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, user: UserId, permissions: impl IntoIterator<Item = Permission>) {
        if let Ok(mut grants) = self.grants.write() {
            grants.entry(user).or_default().extend(permissions);
        }
    }

    pub fn revoke(&self, user: &UserId, permission: &Permission) {
        if let Ok(mut grants) = self.grants.write() {
            if let Some(held) = grants.get_mut(user) {
                held.remove(permission);
            }
        }
    }

    /// Makes every subsequent check fail with `message` (`None` clears it).
    pub fn set_failure(&self, message: Option<String>) {
        if let Ok(mut failure) = self.failure.write() {
            *failure = message;
        }
    }

    /// Number of checks answered so far (including failed ones).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PermissionService for StaticPermissions {
    async fn can_perform(
        &self,
        user: &UserId,
        required: &PermissionSet,
    ) -> Result<bool, PermissionServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let failure = self
            .failure
            .read()
            .map_err(|_| PermissionServiceError::new("lock poisoned"))?
            .clone();
        if let Some(message) = failure {
            return Err(PermissionServiceError(message));
        }

        let grants = self
            .grants
            .read()
            .map_err(|_| PermissionServiceError::new("lock poisoned"))?;

        let Some(held) = grants.get(user) else {
            return Ok(false);
        };

        Ok(held.iter().any(Permission::is_wildcard) || required.iter().any(|p| held.contains(p)))
    }
}
