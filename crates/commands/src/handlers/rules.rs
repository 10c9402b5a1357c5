//! `!rule`: bind roles to filters.

use rolecall_directory::Rule;

use super::{exact_args, listing, usage};
use crate::guard::require_admin;
use crate::registry::{RegistryError, Router, RouterBuilder, handler};
use crate::reply::code_block;
use crate::{CommandError, Invocation, Reply, Services};

const LIST_USAGE: &str = "list";
const CREATE_USAGE: &str = "create <rule_name> <role_name> <filter_name>";
const DESTROY_USAGE: &str = "destroy <rule_name>";
const INFO_USAGE: &str = "info <rule_name>";

pub fn router() -> Result<Router, RegistryError> {
    Ok(RouterBuilder::new("rule", "Administrate Rules")
        .register("list", handler!(list), "List all Rules")?
        .register("create", handler!(create), "Add Rule")?
        .register("destroy", handler!(destroy), "Delete Rule")?
        .register("info", handler!(info), "Get Rule Info")?
        .build())
}

async fn list(services: &Services, invocation: &Invocation) -> Result<Reply, CommandError> {
    exact_args(invocation, 0, LIST_USAGE)?;

    let rules = services.directory.list_rules().await?;

    let lines = rules
        .iter()
        .map(|r| format!("{}: {} <- {}", r.name, r.role, r.filter))
        .collect();
    Ok(listing(lines, "There are no rules"))
}

async fn create(services: &Services, invocation: &Invocation) -> Result<Reply, CommandError> {
    let [name, role, filter] = exact_args(invocation, 3, CREATE_USAGE)? else {
        return Err(usage(invocation, CREATE_USAGE));
    };

    require_admin(services, invocation).await?;

    services
        .directory
        .add_rule(Rule {
            name: name.clone(),
            role: role.clone(),
            filter: filter.clone(),
        })
        .await?;

    tracing::info!(rule = %name, role = %role, filter = %filter, "rule created");
    Ok(Reply::success(format!("Created rule `{name}`")))
}

async fn destroy(services: &Services, invocation: &Invocation) -> Result<Reply, CommandError> {
    let [name] = exact_args(invocation, 1, DESTROY_USAGE)? else {
        return Err(usage(invocation, DESTROY_USAGE));
    };

    require_admin(services, invocation).await?;

    services.directory.remove_rule(name).await?;

    tracing::info!(rule = %name, "rule removed");
    Ok(Reply::success(format!("Removed rule `{name}`")))
}

async fn info(services: &Services, invocation: &Invocation) -> Result<Reply, CommandError> {
    let [name] = exact_args(invocation, 1, INFO_USAGE)? else {
        return Err(usage(invocation, INFO_USAGE));
    };

    let rule = services.directory.get_rule(name).await?;

    Ok(Reply::success(code_block([
        format!("Name: {}", rule.name),
        format!("Role: {}", rule.role),
        format!("Filter: {}", rule.filter),
    ])))
}
