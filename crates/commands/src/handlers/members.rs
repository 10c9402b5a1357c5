//! Filter membership handlers (registered under `!filter`, plus `!role list_members`).

use rolecall_core::UserId;

use super::{exact_args, listing, usage};
use crate::guard::require_admin;
use crate::{CommandError, Invocation, Reply, Services};

const ROLE_MEMBERS_USAGE: &str = "list_members <role_name>";
const FILTER_MEMBERS_USAGE: &str = "list_members <filter_name>";
const ADD_MEMBER_USAGE: &str = "add_member <user> <filter_name>";
const REMOVE_MEMBER_USAGE: &str = "remove_member <user> <filter_name>";

fn member_lines(members: Vec<UserId>) -> Vec<String> {
    members.into_iter().map(|m| m.to_string()).collect()
}

pub(crate) async fn role_members(
    services: &Services,
    invocation: &Invocation,
) -> Result<Reply, CommandError> {
    let [role] = exact_args(invocation, 1, ROLE_MEMBERS_USAGE)? else {
        return Err(usage(invocation, ROLE_MEMBERS_USAGE));
    };

    let members = services.directory.role_members(role).await?;
    Ok(listing(member_lines(members), &format!("Role `{role}` has no members")))
}

pub(crate) async fn filter_members(
    services: &Services,
    invocation: &Invocation,
) -> Result<Reply, CommandError> {
    let [filter] = exact_args(invocation, 1, FILTER_MEMBERS_USAGE)? else {
        return Err(usage(invocation, FILTER_MEMBERS_USAGE));
    };

    let members = services.directory.list_members(filter).await?;
    Ok(listing(member_lines(members), &format!("Filter `{filter}` has no members")))
}

pub(crate) async fn add_member(
    services: &Services,
    invocation: &Invocation,
) -> Result<Reply, CommandError> {
    let [user, filter] = exact_args(invocation, 2, ADD_MEMBER_USAGE)? else {
        return Err(usage(invocation, ADD_MEMBER_USAGE));
    };
    let user = UserId::from_mention_or_raw(user)?;

    require_admin(services, invocation).await?;

    services
        .directory
        .add_members(filter, std::slice::from_ref(&user))
        .await?;

    tracing::info!(user = %user, filter = %filter, "member added");
    Ok(Reply::success(format!("Added `{user}` to `{filter}`")))
}

pub(crate) async fn remove_member(
    services: &Services,
    invocation: &Invocation,
) -> Result<Reply, CommandError> {
    let [user, filter] = exact_args(invocation, 2, REMOVE_MEMBER_USAGE)? else {
        return Err(usage(invocation, REMOVE_MEMBER_USAGE));
    };
    let user = UserId::from_mention_or_raw(user)?;

    require_admin(services, invocation).await?;

    services
        .directory
        .remove_members(filter, std::slice::from_ref(&user))
        .await?;

    tracing::info!(user = %user, filter = %filter, "member removed");
    Ok(Reply::success(format!("Removed `{user}` from `{filter}`")))
}
