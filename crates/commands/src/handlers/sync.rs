//! `!role sync` / `!role sync_members`.

use super::exact_args;
use crate::guard::require_admin;
use crate::{CommandError, Invocation, Reconciler, Reply, Services};

pub(crate) async fn sync_roles(
    services: &Services,
    invocation: &Invocation,
) -> Result<Reply, CommandError> {
    exact_args(invocation, 0, "sync")?;

    require_admin(services, invocation).await?;

    let report = Reconciler::new(services).sync_roles().await?;
    Ok(report.into_reply())
}

pub(crate) async fn sync_members(
    services: &Services,
    invocation: &Invocation,
) -> Result<Reply, CommandError> {
    exact_args(invocation, 0, "sync_members")?;

    require_admin(services, invocation).await?;

    let report = Reconciler::new(services).sync_members().await?;
    Ok(report.into_reply())
}
