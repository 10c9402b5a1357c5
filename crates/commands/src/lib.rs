//! Chat command surface: routing, authorization, handlers and reconciliation.
//!
//! If you're new to this crate, it is structured like:
//! - `dispatcher.rs`: top-level command (`!role`, `!filter`, `!rule`) → router
//! - `registry.rs`: per-command subcommand table + dispatch
//! - `handlers/`: one file per resource area
//! - `reconcile.rs`: directory ↔ chat platform synchronization
//! - `reply.rs` / `error.rs`: typed results, rendered to text only at the boundary

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod invocation;
pub mod reconcile;
pub mod registry;
pub mod reply;
pub mod services;

pub use config::{ConfigError, Settings};
pub use dispatcher::{Dispatcher, build_dispatcher};
pub use error::CommandError;
pub use invocation::Invocation;
pub use reconcile::{Reconciler, SyncReport};
pub use registry::{RegistryError, Router, RouterBuilder};
pub use reply::{Reply, Severity};
pub use services::Services;
