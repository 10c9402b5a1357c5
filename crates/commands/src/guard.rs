//! Authorization guard for mutating commands.
//!
//! This is called **before** a handler issues its mutating collaborator call.

use crate::{CommandError, Invocation, Services};

/// Require the caller to hold one of the configured admin permissions.
pub async fn require_admin(services: &Services, invocation: &Invocation) -> Result<(), CommandError> {
    let allowed = services
        .gate
        .can_perform(invocation.sender(), services.admin_permissions())
        .await?;

    if allowed {
        Ok(())
    } else {
        tracing::warn!(
            sender = invocation.sender(),
            subcommand = invocation.subcommand().unwrap_or(""),
            "mutating command denied"
        );
        Err(CommandError::Denied)
    }
}
