//! Validation cache: last validated version per buffer.
//!
//! Purely a short-circuit. A missing or stale entry never blocks a pass;
//! only an exact version match lets the scheduler skip one.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use hdlint_types::BufferId;

#[derive(Debug, Default)]
pub struct VersionCache {
    versions: Mutex<HashMap<BufferId, u64>>,
}

impl VersionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &BufferId) -> Option<u64> {
        self.lock().get(id).copied()
    }

    /// Record that `id` was validated at `version`.
    pub fn set(&self, id: &BufferId, version: u64) {
        self.lock().insert(id.clone(), version);
    }

    /// Forget `id`. Removing an absent entry is a no-op.
    pub fn remove(&self, id: &BufferId) {
        self.lock().remove(id);
    }

    /// Whether `id` was already validated at exactly `version`.
    pub fn is_current(&self, id: &BufferId, version: u64) -> bool {
        self.get(id) == Some(version)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<BufferId, u64>> {
        self.versions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
