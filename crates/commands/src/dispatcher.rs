//! Top-level command resolution (`!role`, `!filter`, `!rule`).

use std::collections::BTreeMap;

use tracing::Instrument;
use uuid::Uuid;

use crate::handlers::{filters, roles, rules};
use crate::{CommandError, Invocation, RegistryError, Reply, Router, Services, Settings};

/// Maps each top-level command to its [`Router`].
#[derive(Debug)]
pub struct Dispatcher {
    prefix: String,
    routers: BTreeMap<String, Router>,
}

impl Dispatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            routers: BTreeMap::new(),
        }
    }

    pub fn with_router(mut self, router: Router) -> Result<Self, RegistryError> {
        if self.routers.contains_key(router.name()) {
            return Err(RegistryError::Duplicate(router.name().to_string()));
        }
        self.routers.insert(router.name().to_string(), router);
        Ok(self)
    }

    /// Command names without prefix, sorted.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.routers.keys().map(String::as_str)
    }

    fn resolve(&self, token: &str) -> Option<&Router> {
        token
            .strip_prefix(self.prefix.as_str())
            .and_then(|name| self.routers.get(name))
    }

    pub async fn dispatch(&self, services: &Services, invocation: &Invocation) -> Reply {
        let span = tracing::info_span!(
            "invocation",
            id = %Uuid::now_v7(),
            command = invocation.command(),
            subcommand = invocation.subcommand().unwrap_or(""),
            sender = invocation.sender(),
        );

        async {
            let Some(router) = self.resolve(invocation.command()) else {
                tracing::info!("unknown command");
                return Reply::from(CommandError::UnknownCommand(
                    invocation.command().to_string(),
                ));
            };

            let reply = router.dispatch(services, invocation).await;
            tracing::info!(severity = ?reply.severity, "command handled");
            reply
        }
        .instrument(span)
        .await
    }

    /// Parse raw message text, dispatch it and render the reply.
    pub async fn handle_text(&self, services: &Services, sender: &str, text: &str) -> String {
        let invocation = Invocation::parse(sender, text);
        self.dispatch(services, &invocation).await.render()
    }
}

/// Build the dispatcher with every command this bot serves.
pub fn build_dispatcher(settings: &Settings) -> Result<Dispatcher, RegistryError> {
    Dispatcher::new(settings.prefix.clone())
        .with_router(roles::router()?)?
        .with_router(filters::router()?)?
        .with_router(rules::router()?)
}
