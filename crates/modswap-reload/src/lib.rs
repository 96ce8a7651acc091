//! Live module reload for a dispatch host
//!
//! Lets a long-running dispatch process unload, reload, and load extension
//! modules without a restart and without losing in-flight protocol state:
//! - captures the session packets a module needs to re-establish state
//! - replaces commands a module re-declares during a reload instead of
//!   letting the duplicate registration abort the load
//! - purges cached compiled sources so the next load re-reads from disk
//! - replays captured state into a freshly loaded module's hooks
//!
//! The host dispatch process is consumed through the ports defined in
//! `modswap-kernel`; this crate never touches host globals directly.

mod commands;
mod guard;
mod invalidate;
mod manager;
mod registry;
mod state;

pub use commands::{register_commands, CommandPorts};
pub use guard::ReplaceOnConflict;
pub use invalidate::invalidate_tree;
pub use manager::{
    HostPorts, ReloadAction, ReloadConfig, ReloadError, ReloadManager, ReloadReport,
};
pub use registry::{ModuleInfo, ModuleRegistry, ModuleState, RegistryStats};
pub use state::StateCache;
