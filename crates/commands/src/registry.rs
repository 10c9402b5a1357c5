//! Subcommand registry and router.
//!
//! A [`Router`] is built once (via [`RouterBuilder`]) and is immutable
//! afterwards, so concurrent dispatches share it by reference without locking.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::{CommandError, Invocation, Reply, Services};

/// Reserved subcommand that lists every registered entry.
pub const HELP: &str = "help";

pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<Reply, CommandError>> + Send + 'a>>;

/// Subcommand handler: borrows the services and the invocation for one dispatch.
pub type HandlerFn = for<'a> fn(&'a Services, &'a Invocation) -> HandlerFuture<'a>;

/// Turn an `async fn(&Services, &Invocation) -> Result<Reply, CommandError>` into a [`HandlerFn`].
macro_rules! handler {
    ($f:path) => {{
        fn call<'a>(
            services: &'a $crate::Services,
            invocation: &'a $crate::Invocation,
        ) -> $crate::registry::HandlerFuture<'a> {
            Box::pin($f(services, invocation))
        }
        call as $crate::registry::HandlerFn
    }};
}
pub(crate) use handler;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("subcommand '{0}' registered twice")]
    Duplicate(String),

    #[error("subcommand name '{0}' is reserved")]
    Reserved(String),
}

#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub name: &'static str,
    pub help: &'static str,
    handler: HandlerFn,
}

pub struct RouterBuilder {
    name: String,
    description: String,
    entries: BTreeMap<&'static str, Entry>,
}

impl RouterBuilder {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn register(
        mut self,
        name: &'static str,
        handler: HandlerFn,
        help: &'static str,
    ) -> Result<Self, RegistryError> {
        if name == HELP {
            return Err(RegistryError::Reserved(name.to_string()));
        }
        if self.entries.contains_key(name) {
            return Err(RegistryError::Duplicate(name.to_string()));
        }
        self.entries.insert(name, Entry { name, help, handler });
        Ok(self)
    }

    pub fn build(self) -> Router {
        Router {
            name: self.name,
            description: self.description,
            entries: self.entries,
        }
    }
}

/// Immutable subcommand table for one top-level command.
#[derive(Debug)]
pub struct Router {
    name: String,
    description: String,
    entries: BTreeMap<&'static str, Entry>,
}

impl Router {
    /// Command name without prefix (`role`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn lookup(&self, subcommand: &str) -> Option<&Entry> {
        self.entries.get(subcommand)
    }

    /// Entries in name order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Usage, description, then every entry with help text sorted by name.
    pub fn help_text(&self, command: &str) -> String {
        let mut out = format!(
            "```Usage: {command} <subcommand> <arguments>\n{}\n\nSubcommands:\n",
            self.description()
        );
        for entry in self.entries().filter(|e| !e.help.is_empty()) {
            out.push_str(&format!("\t{}: {}\n", entry.name, entry.help));
        }
        out.push_str("```");
        out
    }

    /// Run the subcommand named by `invocation` and turn any error into a reply.
    pub async fn dispatch(&self, services: &Services, invocation: &Invocation) -> Reply {
        let subcommand = match invocation.subcommand() {
            None | Some(HELP) => return Reply::success(self.help_text(invocation.command())),
            Some(name) => name,
        };

        let Some(entry) = self.lookup(subcommand) else {
            tracing::info!(command = %self.name, subcommand, "unknown subcommand");
            return CommandError::UnknownSubcommand(subcommand.to_string()).into();
        };

        match (entry.handler)(services, invocation).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::debug!(command = %self.name, subcommand, error = %err, "subcommand failed");
                err.into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn noop(_: &Services, _: &Invocation) -> Result<Reply, CommandError> {
        Ok(Reply::success("noop"))
    }

    #[test]
    fn rejects_duplicates_and_reserved_names() {
        let dup = RouterBuilder::new("role", "")
            .register("list", handler!(noop), "List")
            .and_then(|b| b.register("list", handler!(noop), "List again"));
        assert_eq!(dup.err(), Some(RegistryError::Duplicate("list".to_string())));

        let reserved = RouterBuilder::new("role", "").register(HELP, handler!(noop), "");
        assert_eq!(reserved.err(), Some(RegistryError::Reserved("help".to_string())));
    }

    #[test]
    fn help_is_sorted_and_skips_hidden_entries() {
        let router = RouterBuilder::new("role", "")
            .register("sync", handler!(noop), "Sync Roles")
            .and_then(|b| b.register("create", handler!(noop), "Add Role"))
            .and_then(|b| b.register("internal", handler!(noop), ""))
            .map(RouterBuilder::build)
            .unwrap();

        let help = router.help_text("!role");
        let create = help.find("create: Add Role").unwrap();
        let sync = help.find("sync: Sync Roles").unwrap();
        assert!(create < sync);
        assert!(!help.contains("internal"));
    }
}
