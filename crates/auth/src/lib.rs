//! `rolecall-auth`: the permission gate in front of every mutating command.
//!
//! Nothing here knows about chat transport or storage: the
//! permission decision itself belongs to a remote [`PermissionService`].

pub mod gate;
pub mod permissions;
pub mod static_policy;

pub use gate::{GateError, PermissionGate, PermissionService, PermissionServiceError};
pub use permissions::{Permission, PermissionSet};
pub use static_policy::StaticPermissions;
