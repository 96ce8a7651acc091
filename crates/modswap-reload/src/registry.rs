//! Module bookkeeping
//!
//! Records the lifecycle facts the manager observes: when a module was
//! loaded, how often it was reloaded, and how its last operation ended. The
//! host's loaded-module set stays authoritative for preconditions; this
//! registry only reports.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Last observed lifecycle state of a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ModuleState {
    /// Not loaded (or never seen).
    #[default]
    Unloaded,
    /// Loaded and presumed running.
    Loaded,
    /// The last load or reload failed.
    Failed(String),
}

impl std::fmt::Display for ModuleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleState::Unloaded => write!(f, "Unloaded"),
            ModuleState::Loaded => write!(f, "Loaded"),
            ModuleState::Failed(err) => write!(f, "Failed: {}", err),
        }
    }
}

/// Lifecycle facts recorded for one module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleInfo {
    /// Module name.
    pub name: String,
    /// Last observed state.
    pub state: ModuleState,
    /// Unix timestamp of the last successful load.
    pub loaded_at: Option<u64>,
    /// Unix timestamp of the last successful reload.
    pub last_reload: Option<u64>,
    /// Successful reload count.
    pub reload_count: u32,
}

impl ModuleInfo {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: ModuleState::Unloaded,
            loaded_at: None,
            last_reload: None,
            reload_count: 0,
        }
    }
}

/// Bookkeeping registry for module lifecycle facts.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: Arc<RwLock<HashMap<String, ModuleInfo>>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_loaded(&self, name: &str) {
        let mut modules = self.modules.write();
        let info = modules
            .entry(name.to_string())
            .or_insert_with(|| ModuleInfo::new(name));
        info.state = ModuleState::Loaded;
        info.loaded_at = Some(unix_now());
    }

    pub fn mark_unloaded(&self, name: &str) {
        let mut modules = self.modules.write();
        let info = modules
            .entry(name.to_string())
            .or_insert_with(|| ModuleInfo::new(name));
        info.state = ModuleState::Unloaded;
    }

    pub fn mark_reloaded(&self, name: &str) {
        let mut modules = self.modules.write();
        let info = modules
            .entry(name.to_string())
            .or_insert_with(|| ModuleInfo::new(name));
        info.state = ModuleState::Loaded;
        info.last_reload = Some(unix_now());
        info.reload_count += 1;
    }

    pub fn mark_failed(&self, name: &str, error: &str) {
        let mut modules = self.modules.write();
        let info = modules
            .entry(name.to_string())
            .or_insert_with(|| ModuleInfo::new(name));
        info.state = ModuleState::Failed(error.to_string());
    }

    pub fn get(&self, name: &str) -> Option<ModuleInfo> {
        self.modules.read().get(name).cloned()
    }

    pub fn list(&self) -> Vec<ModuleInfo> {
        self.modules.read().values().cloned().collect()
    }

    /// Aggregate counts over everything recorded so far.
    pub fn stats(&self) -> RegistryStats {
        let modules = self.modules.read();
        let mut stats = RegistryStats {
            total_modules: modules.len(),
            ..RegistryStats::default()
        };
        for info in modules.values() {
            match info.state {
                ModuleState::Loaded => stats.loaded_modules += 1,
                ModuleState::Failed(_) => stats.failed_modules += 1,
                ModuleState::Unloaded => {}
            }
            stats.total_reloads += info.reload_count as usize;
        }
        stats
    }
}

/// Aggregate registry counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub total_modules: usize,
    pub loaded_modules: usize,
    pub failed_modules: usize,
    pub total_reloads: usize,
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
