//! Subcommand handlers (one file per resource area).
//!
//! Every handler has the same shape:
//! 1. arity check (usage warning, no remote call)
//! 2. input normalization
//! 3. [`require_admin`](crate::guard::require_admin) for mutating subcommands
//! 4. exactly one collaborator call
//! 5. reply formatting

pub mod filters;
pub mod members;
pub mod roles;
pub mod rules;
pub mod sync;

use crate::reply::code_block;
use crate::{CommandError, Invocation, Reply};

/// `Usage: <command> <shape>` warning for this invocation.
pub(crate) fn usage(invocation: &Invocation, shape: &str) -> CommandError {
    CommandError::usage(format!("Usage: {} {shape}", invocation.command()))
}

/// Arguments, if there are exactly `count` of them.
pub(crate) fn exact_args<'a>(
    invocation: &'a Invocation,
    count: usize,
    shape: &str,
) -> Result<&'a [String], CommandError> {
    let args = invocation.args();
    if args.len() == count {
        Ok(args)
    } else {
        Err(usage(invocation, shape))
    }
}

/// Full listing as a code block, or `empty` when there is nothing to show.
pub(crate) fn listing(lines: Vec<String>, empty: &str) -> Reply {
    if lines.is_empty() {
        Reply::success(empty)
    } else {
        Reply::success(code_block(lines))
    }
}
