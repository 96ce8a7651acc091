//! Modswap Testing
//!
//! In-memory doubles for the host ports, so reload orchestration can be
//! exercised deterministically without a live dispatch process: a scriptable
//! dispatch subsystem, a command table that records messages, a parser that
//! echoes its inputs, and a source cache that records purges.

pub mod command;
pub mod dispatch;

pub use command::{run_command, MockCommands};
pub use dispatch::{failing_hook, LoadScript, MockDispatch, RecordingHook};
pub use protocol::MockProtocol;
pub use source::MemorySourceCache;
