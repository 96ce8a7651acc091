//! Dispatch subsystem port
//!
//! The host dispatch process owns the loaded-module set and the per-code
//! hook tables. This module defines the read/trigger interface the reload
//! core uses, plus the hook data types shared with the host.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::command::CommandSink;
use crate::error::HostResult;

/// Numeric message-type code of a protocol packet.
pub type MessageCode = u16;

/// Payload handed to a hook callback, resolved before invocation.
///
/// A hook that declares a definition version receives the payload parsed at
/// that version; a hook without one receives the exact wire bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPayload {
    /// Byte-for-byte copy of the observed payload.
    Raw(Vec<u8>),
    /// Structured event parsed at the hook's declared definition version.
    Parsed(Value),
}

/// Callback bound to a hook registration.
pub type HookCallback = Arc<dyn Fn(&HookPayload) -> HostResult<()> + Send + Sync>;

/// Callback receiving raw payloads for a subscribed message-type code.
pub type RawHookFn = Box<dyn FnMut(MessageCode, &[u8]) + Send>;

/// One callback bound to a message-type code, owned by a module.
#[derive(Clone)]
pub struct HookRegistration {
    /// Name of the module that registered the hook.
    pub module: String,
    /// Human-readable hook name (usually the packet definition name).
    pub name: String,
    /// Definition version the callback expects, if it wants parsed events.
    pub definition_version: Option<u32>,
    /// The callback itself.
    pub callback: HookCallback,
}

impl HookRegistration {
    pub fn new(
        module: impl Into<String>,
        name: impl Into<String>,
        definition_version: Option<u32>,
        callback: HookCallback,
    ) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
            definition_version,
            callback,
        }
    }
}

impl fmt::Debug for HookRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistration")
            .field("module", &self.module)
            .field("name", &self.name)
            .field("definition_version", &self.definition_version)
            .finish_non_exhaustive()
    }
}

/// An ordered group of hooks registered for the same message-type code.
///
/// The host keeps one or more orderings per code; invocation order within an
/// ordering is significant, order across orderings is the host's concern.
#[derive(Debug, Clone, Default)]
pub struct HookOrdering {
    pub hooks: Vec<HookRegistration>,
}

/// Port onto the host dispatch subsystem.
///
/// The loaded-module set is host-owned: this trait only observes membership
/// and triggers transitions, it never mutates the set directly.
pub trait DispatchHost {
    /// Whether `name` is currently in the loaded-module set.
    fn is_loaded(&self, name: &str) -> bool;

    /// Load the module `name`. The module registers its commands through
    /// `commands`, so a caller can scope an add policy to this one call.
    fn load(&mut self, name: &str, commands: &mut dyn CommandSink) -> HostResult<()>;

    /// Unload the module `name`.
    fn unload(&mut self, name: &str) -> HostResult<()>;

    /// All hook orderings currently registered for `code`.
    fn orderings(&self, code: MessageCode) -> Vec<HookOrdering>;

    /// Subscribe to raw payloads observed for `code`.
    fn hook_raw(&mut self, code: MessageCode, callback: RawHookFn);

    /// Protocol version the host is currently speaking.
    fn protocol_version(&self) -> u32;
}
