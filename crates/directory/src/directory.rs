use std::sync::Arc;

use rolecall_core::UserId;

use crate::{Filter, RemoteResult, Role, Rule};

/// The internal, authoritative resource directory (roles, filters, rules, members).
///
/// ## Semantics
///
/// - Records are keyed by their short name; keys are unique per record type
/// - Creating an existing key fails with `RemoteError::AlreadyExists`
/// - Addressing a missing key fails with `RemoteError::NotFound`
/// - Every call is a fresh request/response round-trip; callers never cache
#[async_trait::async_trait]
pub trait ResourceDirectory: Send + Sync {
    async fn list_roles(&self) -> RemoteResult<Vec<Role>>;

    async fn get_role(&self, short_name: &str) -> RemoteResult<Role>;

    async fn add_role(&self, role: Role) -> RemoteResult<()>;

    async fn remove_role(&self, short_name: &str) -> RemoteResult<()>;

    /// Update one attribute of a role; `key` must be one of [`Self::role_keys`].
    async fn set_role(&self, short_name: &str, key: &str, value: &str) -> RemoteResult<()>;

    /// Attribute names accepted by [`Self::set_role`].
    async fn role_keys(&self) -> RemoteResult<Vec<String>>;

    /// Members of the role's primary filter.
    async fn role_members(&self, short_name: &str) -> RemoteResult<Vec<UserId>>;

    /// Roles held by a user (through filter membership).
    async fn user_roles(&self, user: &UserId) -> RemoteResult<Vec<Role>>;

    async fn list_filters(&self) -> RemoteResult<Vec<Filter>>;

    async fn get_filter(&self, name: &str) -> RemoteResult<Filter>;

    async fn add_filter(&self, filter: Filter) -> RemoteResult<()>;

    async fn remove_filter(&self, name: &str) -> RemoteResult<()>;

    async fn list_members(&self, filter: &str) -> RemoteResult<Vec<UserId>>;

    async fn add_members(&self, filter: &str, users: &[UserId]) -> RemoteResult<()>;

    async fn remove_members(&self, filter: &str, users: &[UserId]) -> RemoteResult<()>;

    async fn list_rules(&self) -> RemoteResult<Vec<Rule>>;

    async fn get_rule(&self, name: &str) -> RemoteResult<Rule>;

    async fn add_rule(&self, rule: Rule) -> RemoteResult<()>;

    async fn remove_rule(&self, name: &str) -> RemoteResult<()>;
}

#[async_trait::async_trait]
impl<S> ResourceDirectory for Arc<S>
where
    S: ResourceDirectory + ?Sized,
{
    async fn list_roles(&self) -> RemoteResult<Vec<Role>> {
        (**self).list_roles().await
    }

    async fn get_role(&self, short_name: &str) -> RemoteResult<Role> {
        (**self).get_role(short_name).await
    }

    async fn add_role(&self, role: Role) -> RemoteResult<()> {
        (**self).add_role(role).await
    }

    async fn remove_role(&self, short_name: &str) -> RemoteResult<()> {
        (**self).remove_role(short_name).await
    }

    async fn set_role(&self, short_name: &str, key: &str, value: &str) -> RemoteResult<()> {
        (**self).set_role(short_name, key, value).await
    }

    async fn role_keys(&self) -> RemoteResult<Vec<String>> {
        (**self).role_keys().await
    }

    async fn role_members(&self, short_name: &str) -> RemoteResult<Vec<UserId>> {
        (**self).role_members(short_name).await
    }

    async fn user_roles(&self, user: &UserId) -> RemoteResult<Vec<Role>> {
        (**self).user_roles(user).await
    }

    async fn list_filters(&self) -> RemoteResult<Vec<Filter>> {
        (**self).list_filters().await
    }

    async fn get_filter(&self, name: &str) -> RemoteResult<Filter> {
        (**self).get_filter(name).await
    }

    async fn add_filter(&self, filter: Filter) -> RemoteResult<()> {
        (**self).add_filter(filter).await
    }

    async fn remove_filter(&self, name: &str) -> RemoteResult<()> {
        (**self).remove_filter(name).await
    }

    async fn list_members(&self, filter: &str) -> RemoteResult<Vec<UserId>> {
        (**self).list_members(filter).await
    }

    async fn add_members(&self, filter: &str, users: &[UserId]) -> RemoteResult<()> {
        (**self).add_members(filter, users).await
    }

    async fn remove_members(&self, filter: &str, users: &[UserId]) -> RemoteResult<()> {
        (**self).remove_members(filter, users).await
    }

    async fn list_rules(&self) -> RemoteResult<Vec<Rule>> {
        (**self).list_rules().await
    }

    async fn get_rule(&self, name: &str) -> RemoteResult<Rule> {
        (**self).get_rule(name).await
    }

    async fn add_rule(&self, rule: Rule) -> RemoteResult<()> {
        (**self).add_rule(rule).await
    }

    async fn remove_rule(&self, name: &str) -> RemoteResult<()> {
        (**self).remove_rule(name).await
    }
}
