//! Command table guard
//!
//! A module being reloaded re-declares the commands it owned before the
//! reload, and the host command table rejects duplicate names. This guard
//! wraps the table's `add` for the duration of one load: on a duplicate it
//! removes the existing command and retries once, so the re-declaration
//! replaces the stale handler instead of aborting the load.

use std::sync::Arc;

use tracing::debug;

use modswap_kernel::{CommandError, CommandHandler, CommandHost, CommandSink};

/// Scoped duplicate-tolerant wrapper around the command table.
///
/// Holds the table borrow for exactly one load attempt; when the enclosing
/// call returns or errors the borrow ends and the table's normal add
/// behavior is back, with no way to leave the interception installed.
pub struct ReplaceOnConflict<'a> {
    inner: &'a mut dyn CommandHost,
}

impl<'a> ReplaceOnConflict<'a> {
    pub fn new(inner: &'a mut dyn CommandHost) -> Self {
        Self { inner }
    }
}

impl CommandSink for ReplaceOnConflict<'_> {
    fn add(&mut self, name: &str, handler: CommandHandler) -> Result<(), CommandError> {
        match self.inner.add(name, Arc::clone(&handler)) {
            Err(CommandError::Duplicate(_)) => {
                debug!(command = name, "replacing command re-declared during load");
                self.inner.remove(name);
                self.inner.add(name, handler)
            }
            other => other,
        }
    }

    fn remove(&mut self, name: &str) -> bool {
        self.inner.remove(name)
    }
}
