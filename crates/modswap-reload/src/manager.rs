//! Module lifecycle manager
//!
//! Orchestrates unload → cache invalidation → load → state replay for a
//! named module. Preconditions are validated before any mutation, every
//! outcome ends in a report or a user-facing error, and nothing here can
//! take the host process down.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use modswap_kernel::{
    CommandHost, DispatchHost, HookPayload, HostError, HostResult, MessageCode, ProtocolCodec,
    SourceCache,
};

use crate::guard::ReplaceOnConflict;
use crate::invalidate::invalidate_tree;
use crate::registry::ModuleRegistry;
use crate::state::StateCache;

/// Reload configuration.
#[derive(Debug, Clone)]
pub struct ReloadConfig {
    /// Directory module names resolve under.
    pub modules_root: PathBuf,
    /// Message-type codes captured for state replay, typically the
    /// session-establishment packets.
    pub state_codes: Vec<MessageCode>,
    /// Whether to replay captured state after a successful load.
    pub replay_state: bool,
}

impl ReloadConfig {
    pub fn new<P: Into<PathBuf>>(modules_root: P) -> Self {
        Self {
            modules_root: modules_root.into(),
            state_codes: Vec::new(),
            replay_state: true,
        }
    }

    /// Set the captured message-type codes.
    pub fn with_state_codes(mut self, codes: Vec<MessageCode>) -> Self {
        self.state_codes = codes;
        self
    }

    /// Enable/disable state replay after loads.
    pub fn with_replay_state(mut self, enabled: bool) -> Self {
        self.replay_state = enabled;
        self
    }
}

/// Mutable host ports one lifecycle operation runs against.
pub struct HostPorts<'a> {
    pub dispatch: &'a mut dyn DispatchHost,
    pub commands: &'a mut dyn CommandHost,
    pub protocol: &'a dyn ProtocolCodec,
    pub sources: &'a mut dyn SourceCache,
}

/// Which lifecycle operation ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReloadAction {
    Load,
    Unload,
    Reload,
}

impl ReloadAction {
    /// The chat command this action is registered under.
    pub fn command_name(self) -> &'static str {
        match self {
            ReloadAction::Load => "load",
            ReloadAction::Unload => "unload",
            ReloadAction::Reload => "reload",
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            ReloadAction::Load => "loaded",
            ReloadAction::Unload => "unloaded",
            ReloadAction::Reload => "reloaded",
        }
    }
}

/// Outcome of one successful lifecycle operation.
#[derive(Debug, Clone, Serialize)]
pub struct ReloadReport {
    /// Module the operation ran on.
    pub module: String,
    /// Which operation ran.
    pub action: ReloadAction,
    /// Wall-clock duration of the operation.
    pub duration: Duration,
    /// Hooks that received a replayed payload.
    pub hooks_replayed: usize,
}

impl ReloadReport {
    /// User-facing success line, e.g. "Module chat reloaded."
    pub fn status_line(&self) -> String {
        format!("Module {} {}.", self.module, self.action.past_tense())
    }
}

/// Lifecycle operation failures.
///
/// The `Display` strings are the exact messages delivered to the user.
#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("Invalid argument, module name required.")]
    MissingName,

    #[error("The module {0} can't be found in your modules folder.")]
    NotFound(String),

    #[error("The module {0} is not loaded.")]
    NotLoaded(String),

    #[error("The module {0} is already loaded.")]
    AlreadyLoaded(String),

    #[error("Failed to load the module {name}: {source}")]
    LoadFailed { name: String, source: HostError },

    #[error("Failed to unload the module {name}: {source}")]
    UnloadFailed { name: String, source: HostError },

    #[error("Failed to reload the module {name}: {source}")]
    ReloadFailed { name: String, source: HostError },
}

/// Orchestrates module lifecycle operations against the host ports.
///
/// Holds no per-operation state; the shared pieces are the session state
/// cache and the bookkeeping registry. Operations are synchronous and run to
/// completion within the invoking event turn.
pub struct ReloadManager {
    config: ReloadConfig,
    state: StateCache,
    registry: ModuleRegistry,
}

impl ReloadManager {
    pub fn new(config: ReloadConfig) -> Self {
        let state = StateCache::new(config.state_codes.clone());
        Self {
            config,
            state,
            registry: ModuleRegistry::new(),
        }
    }

    /// Install the raw-packet subscriptions that keep the state cache warm.
    ///
    /// Call once at startup, before any traffic is dispatched.
    pub fn track_session_state(&self, dispatch: &mut dyn DispatchHost) {
        self.state.subscribe(dispatch);
    }

    pub fn config(&self) -> &ReloadConfig {
        &self.config
    }

    pub fn state(&self) -> &StateCache {
        &self.state
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Load a module that exists on disk and is not currently loaded.
    pub fn load(&self, name: &str, host: &mut HostPorts<'_>) -> Result<ReloadReport, ReloadError> {
        let started = Instant::now();
        self.resolve(name)?;
        if host.dispatch.is_loaded(name) {
            return Err(ReloadError::AlreadyLoaded(name.to_string()));
        }

        info!(module = name, "loading module");
        let hooks_replayed = match self.guarded_load(name, host) {
            Ok(replayed) => replayed,
            Err(source) => {
                self.registry.mark_failed(name, &source.to_string());
                return Err(ReloadError::LoadFailed {
                    name: name.to_string(),
                    source,
                });
            }
        };

        self.registry.mark_loaded(name);
        Ok(self.report(name, ReloadAction::Load, started, hooks_replayed))
    }

    /// Unload a module and purge its cached sources.
    pub fn unload(
        &self,
        name: &str,
        host: &mut HostPorts<'_>,
    ) -> Result<ReloadReport, ReloadError> {
        let started = Instant::now();
        let path = self.resolve(name)?;
        if !host.dispatch.is_loaded(name) {
            return Err(ReloadError::NotLoaded(name.to_string()));
        }

        info!(module = name, "unloading module");
        host.dispatch
            .unload(name)
            .map_err(|source| ReloadError::UnloadFailed {
                name: name.to_string(),
                source,
            })?;
        invalidate_tree(&path, host.sources);

        self.registry.mark_unloaded(name);
        Ok(self.report(name, ReloadAction::Unload, started, 0))
    }

    /// Reload a currently loaded module: unload, purge its sources, load a
    /// fresh copy, and replay captured session state into its hooks.
    pub fn reload(
        &self,
        name: &str,
        host: &mut HostPorts<'_>,
    ) -> Result<ReloadReport, ReloadError> {
        let started = Instant::now();
        let path = self.resolve(name)?;
        if !host.dispatch.is_loaded(name) {
            return Err(ReloadError::NotLoaded(name.to_string()));
        }

        info!(module = name, "reloading module");
        host.dispatch
            .unload(name)
            .map_err(|source| ReloadError::ReloadFailed {
                name: name.to_string(),
                source,
            })?;
        invalidate_tree(&path, host.sources);

        // A failure past this point leaves the module unloaded; the previous
        // version is not restored.
        let hooks_replayed = match self.guarded_load(name, host) {
            Ok(replayed) => replayed,
            Err(source) => {
                self.registry.mark_failed(name, &source.to_string());
                return Err(ReloadError::ReloadFailed {
                    name: name.to_string(),
                    source,
                });
            }
        };

        self.registry.mark_reloaded(name);
        Ok(self.report(name, ReloadAction::Reload, started, hooks_replayed))
    }

    /// Validate the name and resolve it under the modules root.
    fn resolve(&self, name: &str) -> Result<PathBuf, ReloadError> {
        if name.is_empty() {
            return Err(ReloadError::MissingName);
        }
        let path = self.config.modules_root.join(name);
        if !path.exists() {
            return Err(ReloadError::NotFound(name.to_string()));
        }
        Ok(path)
    }

    /// Host load with the duplicate-tolerant command guard installed.
    ///
    /// The guard's borrow ends when this function returns, so the table's
    /// normal add behavior is restored on every exit path, including a load
    /// failure.
    fn guarded_load(&self, name: &str, host: &mut HostPorts<'_>) -> HostResult<usize> {
        {
            let mut guard = ReplaceOnConflict::new(&mut *host.commands);
            host.dispatch.load(name, &mut guard)?;
        }

        if self.config.replay_state && host.dispatch.is_loaded(name) {
            Ok(self.replay(name, host.dispatch, host.protocol))
        } else {
            Ok(0)
        }
    }

    /// Replay captured session payloads into the module's hooks.
    ///
    /// Each delivery is isolated: a parse failure or a callback error is
    /// logged with the hook and module name, and the remaining hooks still
    /// run. Returns the number of hooks that received a payload.
    fn replay(
        &self,
        module: &str,
        dispatch: &dyn DispatchHost,
        protocol: &dyn ProtocolCodec,
    ) -> usize {
        let protocol_version = dispatch.protocol_version();
        let mut delivered = 0usize;

        for (code, payload) in self.state.snapshot() {
            for ordering in dispatch.orderings(code) {
                for hook in ordering.hooks.iter().filter(|h| h.module == module) {
                    let event = match hook.definition_version {
                        Some(version) => {
                            match protocol.parse(protocol_version, code, version, &payload) {
                                Ok(parsed) => HookPayload::Parsed(parsed),
                                Err(e) => {
                                    warn!(
                                        hook = %hook.name,
                                        module,
                                        code,
                                        "failed to generate replay packet: {e}"
                                    );
                                    continue;
                                }
                            }
                        }
                        None => HookPayload::Raw(payload.clone()),
                    };
                    match (hook.callback)(&event) {
                        Ok(()) => delivered += 1,
                        Err(e) => {
                            warn!(hook = %hook.name, module, code, "replay callback failed: {e}");
                        }
                    }
                }
            }
        }

        debug!(module, delivered, "state replay complete");
        delivered
    }

    fn report(
        &self,
        name: &str,
        action: ReloadAction,
        started: Instant,
        hooks_replayed: usize,
    ) -> ReloadReport {
        let report = ReloadReport {
            module: name.to_string(),
            action,
            duration: started.elapsed(),
            hooks_replayed,
        };
        info!(
            module = name,
            action = action.command_name(),
            hooks_replayed,
            "module {} {}",
            name,
            action.past_tense()
        );
        report
    }
}
