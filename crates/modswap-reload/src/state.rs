//! Session state capture
//!
//! Passively records the most recent raw payload observed for each tracked
//! message-type code. A module that is reloaded mid-session missed those
//! packets; replaying the recorded payloads brings it back up to date.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use modswap_kernel::{DispatchHost, MessageCode};

/// Last-seen raw payload per tracked message-type code.
///
/// One entry per code, overwritten in place on every observation; entries are
/// never removed, they live as long as the process. Cloning shares the
/// underlying map, so the subscription closures and the manager see the same
/// entries.
#[derive(Debug, Clone, Default)]
pub struct StateCache {
    codes: Vec<MessageCode>,
    entries: Arc<RwLock<HashMap<MessageCode, Vec<u8>>>>,
}

impl StateCache {
    /// Create a cache tracking exactly `codes`.
    pub fn new(codes: Vec<MessageCode>) -> Self {
        Self {
            codes,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Install one raw-packet subscription per tracked code.
    ///
    /// Call once at startup, before traffic is dispatched. Each observation
    /// stores an exact byte copy, replacing the prior entry for that code.
    pub fn subscribe(&self, dispatch: &mut dyn DispatchHost) {
        for &code in &self.codes {
            let entries = Arc::clone(&self.entries);
            dispatch.hook_raw(
                code,
                Box::new(move |observed, data| {
                    entries.write().insert(observed, data.to_vec());
                }),
            );
        }
        debug!(codes = ?self.codes, "subscribed to session state packets");
    }

    /// The codes this cache was built to track.
    pub fn tracked_codes(&self) -> &[MessageCode] {
        &self.codes
    }

    /// Current (code, payload) pairs, in no guaranteed order.
    pub fn snapshot(&self) -> Vec<(MessageCode, Vec<u8>)> {
        self.entries
            .read()
            .iter()
            .map(|(code, payload)| (*code, payload.clone()))
            .collect()
    }

    /// Last payload recorded for `code`, if any was observed.
    pub fn payload(&self, code: MessageCode) -> Option<Vec<u8>> {
        self.entries.read().get(&code).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop all recorded payloads. Test hook; nothing in the reload path
    /// clears session state.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
