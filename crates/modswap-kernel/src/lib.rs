//! Host interface layer for the Modswap reload stack.
//!
//! A long-running dispatch process owns the loaded-module set, the packet
//! hook tables, the protocol parser, and the command table. This crate
//! defines the ports through which the reload orchestration consumes those
//! subsystems, so the core never reaches into host globals:
//! - [`DispatchHost`]: module load/unload, hook queries, raw-packet taps
//! - [`ProtocolCodec`]: payload parsing at a declared definition version
//! - [`CommandSink`] / [`CommandHost`]: command registration and user messages
//! - [`SourceCache`]: the loader's cache of compiled module sources

pub mod command;
pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod source;

pub use command::{CommandError, CommandHandler, CommandHost, CommandSink};
pub use dispatch::{
    DispatchHost, HookCallback, HookOrdering, HookPayload, HookRegistration, MessageCode,
    RawHookFn,
};
pub use error::{HostError, HostResult};
pub use protocol::{ParseError, ProtocolCodec};
pub use source::SourceCache;
