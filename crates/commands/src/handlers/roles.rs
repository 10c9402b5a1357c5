//! `!role`: administrate roles.

use rolecall_core::{CallerIdentity, is_user_mention, join_trailing};
use rolecall_directory::Role;

use super::{exact_args, listing, members, sync, usage};
use crate::guard::require_admin;
use crate::registry::{RegistryError, Router, RouterBuilder, handler};
use crate::reply::code_block;
use crate::{CommandError, Invocation, Reply, Services};

const LIST_USAGE: &str = "list [all]";
const CREATE_USAGE: &str = "create <role_name> <filter> <role_description>";
const DESTROY_USAGE: &str = "destroy <role_name>";
const INFO_USAGE: &str = "info <role_name>";
const KEYS_USAGE: &str = "keys";
const SET_USAGE: &str = "set <role_name> <key> <value>";
const LIST_ROLES_USAGE: &str = "list_roles";

pub fn router() -> Result<Router, RegistryError> {
    Ok(RouterBuilder::new("role", "Administrate Roles, Rules and Filters")
        .register("list", handler!(list), "List all Roles")?
        .register("create", handler!(create), "Add Role")?
        .register("destroy", handler!(destroy), "Delete role")?
        .register("info", handler!(info), "Get Role Info")?
        .register("keys", handler!(keys), "Get valid role keys")?
        .register("set", handler!(set), "Set role key")?
        .register("list_members", handler!(members::role_members), "List Role members")?
        .register("list_roles", handler!(user_roles), "List user Roles")?
        .register("sync", handler!(sync::sync_roles), "Sync Roles to chat service")?
        .register(
            "sync_members",
            handler!(sync::sync_members),
            "Sync Role members with chat service",
        )?
        .build())
}

fn describe(role: &Role) -> String {
    format!(
        "{}: {} (kind={}, filters={}/{}, joinable={}, sig={})",
        role.short_name, role.name, role.kind, role.filter_a, role.filter_b, role.joinable, role.sig
    )
}

async fn list(services: &Services, invocation: &Invocation) -> Result<Reply, CommandError> {
    let detailed = match invocation.args() {
        [] => false,
        [flag] if flag == "all" => true,
        _ => return Err(usage(invocation, LIST_USAGE)),
    };

    let roles = services.directory.list_roles().await?;

    let lines = roles
        .iter()
        .map(|role| {
            if detailed {
                describe(role)
            } else {
                format!("{}: {}", role.short_name, role.name)
            }
        })
        .collect();

    Ok(listing(lines, "There are no roles"))
}

async fn create(services: &Services, invocation: &Invocation) -> Result<Reply, CommandError> {
    let [short_name, filter, description @ ..] = invocation.args() else {
        return Err(usage(invocation, CREATE_USAGE));
    };

    let name = join_trailing(description);
    if name.is_empty() {
        return Err(usage(invocation, CREATE_USAGE));
    }
    if is_user_mention(short_name) {
        return Err(CommandError::usage("Discord users may not be roles"));
    }
    if is_user_mention(&name) {
        return Err(CommandError::usage("Discord users may not be descriptions"));
    }

    require_admin(services, invocation).await?;

    let role = Role::new(short_name.as_str(), name).with_filter(filter.as_str());
    services.directory.add_role(role).await?;

    tracing::info!(role = %short_name, "role created");
    Ok(Reply::success(format!("Created role `{short_name}`")))
}

async fn destroy(services: &Services, invocation: &Invocation) -> Result<Reply, CommandError> {
    let [short_name] = exact_args(invocation, 1, DESTROY_USAGE)? else {
        return Err(usage(invocation, DESTROY_USAGE));
    };

    require_admin(services, invocation).await?;

    services.directory.remove_role(short_name).await?;

    tracing::info!(role = %short_name, "role removed");
    Ok(Reply::success(format!("Removed role `{short_name}`")))
}

async fn info(services: &Services, invocation: &Invocation) -> Result<Reply, CommandError> {
    let [short_name] = exact_args(invocation, 1, INFO_USAGE)? else {
        return Err(usage(invocation, INFO_USAGE));
    };

    let role = services.directory.get_role(short_name).await?;

    Ok(Reply::success(code_block([
        format!("ShortName: {}", role.short_name),
        format!("Type: {}", role.kind),
        format!("Name: {}", role.name),
        format!("Color: #{:06x}", role.color),
        format!("Hoist: {}", role.hoist),
        format!("Position: {}", role.position),
        format!("Mentionable: {}", role.mentionable),
        format!("Joinable: {}", role.joinable),
        format!("Sig: {}", role.sig),
        format!("FilterA: {}", role.filter_a),
        format!("FilterB: {}", role.filter_b),
    ])))
}

async fn keys(services: &Services, invocation: &Invocation) -> Result<Reply, CommandError> {
    exact_args(invocation, 0, KEYS_USAGE)?;

    let keys = services.directory.role_keys().await?;

    if keys.is_empty() {
        return Ok(Reply::success("There are no role keys"));
    }
    let lines = std::iter::once("Keys:".to_string())
        .chain(keys.into_iter().map(|k| format!("\t{k}")));
    Ok(Reply::success(code_block(lines)))
}

async fn set(services: &Services, invocation: &Invocation) -> Result<Reply, CommandError> {
    let [short_name, key, value] = exact_args(invocation, 3, SET_USAGE)? else {
        return Err(usage(invocation, SET_USAGE));
    };

    require_admin(services, invocation).await?;

    services.directory.set_role(short_name, key, value).await?;

    tracing::info!(role = %short_name, key = %key, "role updated");
    Ok(Reply::success(format!("Set {key} of `{short_name}` to '{value}'")))
}

/// Roles held by the caller.
async fn user_roles(services: &Services, invocation: &Invocation) -> Result<Reply, CommandError> {
    exact_args(invocation, 0, LIST_ROLES_USAGE)?;

    let caller: CallerIdentity = invocation.sender().parse()?;
    let roles = services.directory.user_roles(caller.user_id()).await?;

    let lines = roles
        .iter()
        .map(|role| format!("{}: {}", role.short_name, role.name))
        .collect();
    Ok(listing(lines, "You have no roles"))
}
