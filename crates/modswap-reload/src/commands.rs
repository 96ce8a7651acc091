//! Chat command front
//!
//! Registers the `load`, `unload` and `reload` commands against the host
//! command table. Each handler runs the matching lifecycle operation to
//! completion and delivers exactly one message back to the user, success or
//! failure.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use modswap_kernel::{CommandError, CommandHost, DispatchHost, ProtocolCodec, SourceCache};

use crate::manager::{HostPorts, ReloadAction, ReloadManager};

/// Shared handles to the host ports, cloned into each command handler.
pub struct CommandPorts {
    pub dispatch: Arc<Mutex<dyn DispatchHost + Send>>,
    pub commands: Arc<Mutex<dyn CommandHost + Send>>,
    pub protocol: Arc<dyn ProtocolCodec + Send + Sync>,
    pub sources: Arc<Mutex<dyn SourceCache + Send>>,
}

impl Clone for CommandPorts {
    fn clone(&self) -> Self {
        Self {
            dispatch: Arc::clone(&self.dispatch),
            commands: Arc::clone(&self.commands),
            protocol: Arc::clone(&self.protocol),
            sources: Arc::clone(&self.sources),
        }
    }
}

/// Register the three lifecycle commands on the host command table.
///
/// The host must not hold the command table lock while invoking a handler;
/// handlers re-enter the table to deliver their result message.
pub fn register_commands(
    manager: &Arc<ReloadManager>,
    ports: &CommandPorts,
) -> Result<(), CommandError> {
    for action in [
        ReloadAction::Load,
        ReloadAction::Unload,
        ReloadAction::Reload,
    ] {
        let manager = Arc::clone(manager);
        let handler_ports = ports.clone();
        ports.commands.lock().add(
            action.command_name(),
            Arc::new(move |args| run(action, &manager, &handler_ports, args)),
        )?;
    }
    Ok(())
}

/// Run one lifecycle command and message the outcome to the user.
fn run(action: ReloadAction, manager: &ReloadManager, ports: &CommandPorts, args: &[String]) {
    let name = args.first().map(String::as_str).unwrap_or("");

    let text = {
        let mut dispatch = ports.dispatch.lock();
        let mut commands = ports.commands.lock();
        let mut sources = ports.sources.lock();
        let mut host = HostPorts {
            dispatch: &mut *dispatch,
            commands: &mut *commands,
            protocol: &*ports.protocol,
            sources: &mut *sources,
        };

        let result = match action {
            ReloadAction::Load => manager.load(name, &mut host),
            ReloadAction::Unload => manager.unload(name, &mut host),
            ReloadAction::Reload => manager.reload(name, &mut host),
        };

        match result {
            Ok(report) => report.status_line(),
            Err(e) => {
                debug!(module = name, command = action.command_name(), "{e}");
                e.to_string()
            }
        }
    };

    ports.commands.lock().message(&text);
}
