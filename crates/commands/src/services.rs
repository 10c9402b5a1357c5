//! Collaborator wiring shared by every handler.

use std::sync::Arc;

use rolecall_auth::{PermissionGate, PermissionService, PermissionSet};
use rolecall_directory::{ChatPlatform, ResourceDirectory};

use crate::Settings;

/// Long-lived collaborator handles plus read-only settings.
///
/// Cloning is cheap; nothing in here is mutated after construction.
#[derive(Clone)]
pub struct Services {
    pub directory: Arc<dyn ResourceDirectory>,
    pub platform: Arc<dyn ChatPlatform>,
    pub gate: PermissionGate,
    pub settings: Arc<Settings>,
    admin_permissions: PermissionSet,
}

impl Services {
    pub fn new(
        directory: Arc<dyn ResourceDirectory>,
        platform: Arc<dyn ChatPlatform>,
        permissions: Arc<dyn PermissionService>,
        settings: Settings,
    ) -> Self {
        let admin_permissions = settings.admin_permission_set();
        Self {
            directory,
            platform,
            gate: PermissionGate::new(permissions),
            settings: Arc::new(settings),
            admin_permissions,
        }
    }

    /// Permissions checked before every mutating command.
    pub fn admin_permissions(&self) -> &PermissionSet {
        &self.admin_permissions
    }
}
