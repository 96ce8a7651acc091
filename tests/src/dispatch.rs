//! Scriptable dispatch subsystem double.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

use modswap_kernel::{
    CommandHandler, CommandSink, DispatchHost, HookOrdering, HookPayload, HookRegistration,
    HostError, HostResult, MessageCode, RawHookFn,
};

/// What `MockDispatch::load` should do for one module.
///
/// A real module registers its commands and hooks while its source executes;
/// the script plays that part.
#[derive(Clone, Default)]
pub struct LoadScript {
    /// Fail the load with this reason instead of loading.
    pub fail_with: Option<String>,
    /// Commands the module registers through the provided sink.
    pub commands: Vec<(String, CommandHandler)>,
    /// Hooks the module registers, one ordering per load.
    pub hooks: Vec<(MessageCode, HookRegistration)>,
}

impl LoadScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            fail_with: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub fn with_command(mut self, name: &str, handler: CommandHandler) -> Self {
        self.commands.push((name.to_string(), handler));
        self
    }

    pub fn with_hook(mut self, code: MessageCode, hook: HookRegistration) -> Self {
        self.hooks.push((code, hook));
        self
    }
}

/// In-memory dispatch subsystem.
///
/// Tracks the loaded-module set and hook tables the way a host would, records
/// every load/unload call, and lets tests feed raw packets to subscribers.
#[derive(Default)]
pub struct MockDispatch {
    protocol_version: u32,
    loaded: HashSet<String>,
    orderings: HashMap<MessageCode, Vec<HookOrdering>>,
    raw_hooks: Vec<(MessageCode, RawHookFn)>,
    scripts: HashMap<String, LoadScript>,
    unload_failures: HashMap<String, String>,
    load_calls: Vec<String>,
    unload_calls: Vec<String>,
}

impl MockDispatch {
    pub fn new() -> Self {
        Self {
            protocol_version: 1,
            ..Self::default()
        }
    }

    pub fn with_protocol_version(mut self, version: u32) -> Self {
        self.protocol_version = version;
        self
    }

    /// Script what loading `name` does.
    pub fn script_load(&mut self, name: &str, script: LoadScript) {
        self.scripts.insert(name.to_string(), script);
    }

    /// Make every unload of `name` fail with `reason`.
    pub fn fail_unload(&mut self, name: &str, reason: &str) {
        self.unload_failures
            .insert(name.to_string(), reason.to_string());
    }

    /// Put `name` into the loaded set without going through `load`.
    pub fn set_loaded(&mut self, name: &str) {
        self.loaded.insert(name.to_string());
    }

    /// Install a hook directly, as if its module registered it earlier.
    pub fn install_hook(&mut self, code: MessageCode, hook: HookRegistration) {
        self.orderings
            .entry(code)
            .or_default()
            .push(HookOrdering { hooks: vec![hook] });
    }

    /// Feed a raw packet to every subscriber for `code`.
    pub fn packet(&mut self, code: MessageCode, data: &[u8]) {
        for (subscribed, callback) in &mut self.raw_hooks {
            if *subscribed == code {
                callback(code, data);
            }
        }
    }

    pub fn load_calls(&self) -> &[String] {
        &self.load_calls
    }

    pub fn unload_calls(&self) -> &[String] {
        &self.unload_calls
    }
}

impl DispatchHost for MockDispatch {
    fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains(name)
    }

    fn load(&mut self, name: &str, commands: &mut dyn CommandSink) -> HostResult<()> {
        self.load_calls.push(name.to_string());

        let script = self.scripts.get(name).cloned().unwrap_or_default();
        if let Some(reason) = script.fail_with {
            return Err(HostError::LoadFailed(reason));
        }

        // A rejected command registration aborts the module's load, which is
        // exactly the failure mode the reload guard exists to absorb.
        for (command, handler) in script.commands {
            commands
                .add(&command, handler)
                .map_err(|e| HostError::LoadFailed(e.to_string()))?;
        }

        for (code, hook) in script.hooks {
            self.orderings
                .entry(code)
                .or_default()
                .push(HookOrdering { hooks: vec![hook] });
        }

        self.loaded.insert(name.to_string());
        Ok(())
    }

    fn unload(&mut self, name: &str) -> HostResult<()> {
        self.unload_calls.push(name.to_string());

        if let Some(reason) = self.unload_failures.get(name) {
            return Err(HostError::UnloadFailed(reason.clone()));
        }

        self.loaded.remove(name);
        for orderings in self.orderings.values_mut() {
            for ordering in orderings.iter_mut() {
                ordering.hooks.retain(|h| h.module != name);
            }
            orderings.retain(|o| !o.hooks.is_empty());
        }
        Ok(())
    }

    fn orderings(&self, code: MessageCode) -> Vec<HookOrdering> {
        self.orderings.get(&code).cloned().unwrap_or_default()
    }

    fn hook_raw(&mut self, code: MessageCode, callback: RawHookFn) {
        self.raw_hooks.push((code, callback));
    }

    fn protocol_version(&self) -> u32 {
        self.protocol_version
    }
}

/// Builds hook registrations whose callbacks record every payload received.
#[derive(Clone, Default)]
pub struct RecordingHook {
    payloads: Arc<Mutex<Vec<HookPayload>>>,
}

impl RecordingHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registration(
        &self,
        module: &str,
        name: &str,
        definition_version: Option<u32>,
    ) -> HookRegistration {
        let payloads = Arc::clone(&self.payloads);
        HookRegistration::new(
            module,
            name,
            definition_version,
            Arc::new(move |payload| {
                payloads.lock().push(payload.clone());
                Ok(())
            }),
        )
    }

    pub fn payloads(&self) -> Vec<HookPayload> {
        self.payloads.lock().clone()
    }
}

/// A hook registration whose callback always fails.
pub fn failing_hook(module: &str, name: &str) -> HookRegistration {
    HookRegistration::new(
        module,
        name,
        None,
        Arc::new(|_| Err(HostError::Hook("scripted hook failure".into()))),
    )
}
