//! `!filter`: administrate filters and their members.

use rolecall_core::{is_user_mention, join_trailing};
use rolecall_directory::Filter;

use super::{exact_args, listing, members, usage};
use crate::guard::require_admin;
use crate::registry::{RegistryError, Router, RouterBuilder, handler};
use crate::{CommandError, Invocation, Reply, Services};

const LIST_USAGE: &str = "list";
const CREATE_USAGE: &str = "create <filter_name> <filter_description>";
const DESTROY_USAGE: &str = "destroy <filter_name>";

pub fn router() -> Result<Router, RegistryError> {
    Ok(RouterBuilder::new("filter", "Administrate Filters")
        .register("list", handler!(list), "List all Filters")?
        .register("create", handler!(create), "Add Filter")?
        .register("destroy", handler!(destroy), "Delete Filter")?
        .register("list_members", handler!(members::filter_members), "List all Filter Members")?
        .register("add_member", handler!(members::add_member), "Add Filter Member")?
        .register("remove_member", handler!(members::remove_member), "Remove Filter Member")?
        .build())
}

async fn list(services: &Services, invocation: &Invocation) -> Result<Reply, CommandError> {
    exact_args(invocation, 0, LIST_USAGE)?;

    let filters = services.directory.list_filters().await?;

    let lines = filters
        .iter()
        .map(|f| format!("{}: {}", f.name, f.description))
        .collect();
    Ok(listing(lines, "There are no filters"))
}

async fn create(services: &Services, invocation: &Invocation) -> Result<Reply, CommandError> {
    let [name, description @ ..] = invocation.args() else {
        return Err(usage(invocation, CREATE_USAGE));
    };

    let description = join_trailing(description);
    if description.is_empty() {
        return Err(usage(invocation, CREATE_USAGE));
    }
    if is_user_mention(name) {
        return Err(CommandError::usage("Discord users may not be filters"));
    }

    require_admin(services, invocation).await?;

    services
        .directory
        .add_filter(Filter {
            name: name.clone(),
            description,
        })
        .await?;

    tracing::info!(filter = %name, "filter created");
    Ok(Reply::success(format!("Created filter `{name}`")))
}

async fn destroy(services: &Services, invocation: &Invocation) -> Result<Reply, CommandError> {
    let [name] = exact_args(invocation, 1, DESTROY_USAGE)? else {
        return Err(usage(invocation, DESTROY_USAGE));
    };

    require_admin(services, invocation).await?;

    services.directory.remove_filter(name).await?;

    tracing::info!(filter = %name, "filter removed");
    Ok(Reply::success(format!("Removed filter `{name}`")))
}
