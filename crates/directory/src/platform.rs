use std::sync::Arc;

use rolecall_core::UserId;

use crate::{PlatformRole, RemoteResult};

/// The chat platform's native role directory for one guild (server).
///
/// Roles are addressed by display name. Creating a role whose name is taken
/// fails with `RemoteError::AlreadyExists`.
#[async_trait::async_trait]
pub trait ChatPlatform: Send + Sync {
    async fn get_all_roles(&self, guild: &str) -> RemoteResult<Vec<PlatformRole>>;

    async fn create_role(&self, guild: &str, name: &str) -> RemoteResult<PlatformRole>;

    async fn delete_role(&self, guild: &str, name: &str) -> RemoteResult<()>;

    async fn role_members(&self, guild: &str, role: &str) -> RemoteResult<Vec<UserId>>;

    async fn add_member_role(&self, guild: &str, user: &UserId, role: &str) -> RemoteResult<()>;
}

#[async_trait::async_trait]
impl<S> ChatPlatform for Arc<S>
where
    S: ChatPlatform + ?Sized,
{
    async fn get_all_roles(&self, guild: &str) -> RemoteResult<Vec<PlatformRole>> {
        (**self).get_all_roles(guild).await
    }

    async fn create_role(&self, guild: &str, name: &str) -> RemoteResult<PlatformRole> {
        (**self).create_role(guild, name).await
    }

    async fn delete_role(&self, guild: &str, name: &str) -> RemoteResult<()> {
        (**self).delete_role(guild, name).await
    }

    async fn role_members(&self, guild: &str, role: &str) -> RemoteResult<Vec<UserId>> {
        (**self).role_members(guild, role).await
    }

    async fn add_member_role(&self, guild: &str, user: &UserId, role: &str) -> RemoteResult<()> {
        (**self).add_member_role(guild, user, role).await
    }
}
