//! Dev console: drive the bot from stdin against in-memory collaborators.
//!
//! Each input line is `<platform:user> <command text>`, e.g.
//! `discord:1 !role create fc fc_members Fleet Commanders`.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

use rolecall_auth::StaticPermissions;
use rolecall_commands::{Services, Settings, build_dispatcher};
use rolecall_core::CallerIdentity;
use rolecall_directory::{InMemoryDirectory, InMemoryPlatform};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rolecall_observability::init();

    let settings = Settings::load().context("failed to load settings")?;
    let dispatcher = build_dispatcher(&settings).context("failed to register commands")?;

    let permissions = Arc::new(StaticPermissions::new());
    match std::env::var("ROLECALL_ADMIN") {
        Ok(admin) => {
            let admin: CallerIdentity = admin.parse().context("invalid ROLECALL_ADMIN")?;
            permissions.grant(
                admin.user_id().clone(),
                settings.admin_permission_set().iter().cloned(),
            );
            tracing::info!(admin = %admin, "granted admin permissions");
        }
        Err(_) => tracing::warn!("ROLECALL_ADMIN not set; every mutating command will be denied"),
    }

    let services = Services::new(
        Arc::new(InMemoryDirectory::new()),
        Arc::new(InMemoryPlatform::new()),
        permissions,
        settings,
    );

    tracing::info!(commands = ?dispatcher.commands().collect::<Vec<_>>(), "console ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((sender, text)) = line.split_once(char::is_whitespace) else {
            println!("expected `<platform:user> <command text>`");
            continue;
        };

        println!("{}", dispatcher.handle_text(&services, sender, text).await);
    }

    Ok(())
}
