//! Command subsystem port
//!
//! The host command subsystem owns the process-wide command table and the
//! channel for user-facing status text. Handlers are `Arc` so a registration
//! can be retried or re-submitted without consuming the closure.

use std::sync::Arc;

use thiserror::Error;

/// Handler invoked with the arguments following the command name.
pub type CommandHandler = Arc<dyn Fn(&[String]) + Send + Sync>;

/// Errors from the host command table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// A command under this name is already registered.
    #[error("command '{0}' is already registered")]
    Duplicate(String),

    /// No command is registered under this name.
    #[error("command '{0}' is not registered")]
    NotFound(String),
}

/// Registration interface of the command table.
///
/// `DispatchHost::load` routes the loading module's registrations through a
/// `CommandSink`, which is the seam the reload guard wraps.
pub trait CommandSink {
    /// Register `handler` under `name`.
    fn add(&mut self, name: &str, handler: CommandHandler) -> Result<(), CommandError>;

    /// Remove the command registered under `name`. Returns whether one existed.
    fn remove(&mut self, name: &str) -> bool;
}

/// Full command subsystem port: registration plus user-facing messaging.
pub trait CommandHost: CommandSink {
    /// Deliver a status line to the user.
    fn message(&mut self, text: &str);
}
