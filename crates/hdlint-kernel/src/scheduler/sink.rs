//! Where published diagnostics go.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use hdlint_types::{BufferId, Diagnostic};

/// Receives the full diagnostic set for a buffer after each pass.
///
/// Every `publish` replaces whatever was published before for that buffer.
pub trait DiagnosticsSink: Send + Sync {
    fn publish(&self, buffer: &BufferId, diagnostics: Vec<Diagnostic>);

    /// Drop everything published for `buffer`.
    fn clear(&self, buffer: &BufferId);
}

/// A sink that keeps the latest set per buffer in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    published: Mutex<HashMap<BufferId, Vec<Diagnostic>>>,
    publishes: AtomicUsize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest diagnostics for `buffer`, if anything was published.
    pub fn get(&self, buffer: &BufferId) -> Option<Vec<Diagnostic>> {
        self.lock().get(buffer).cloned()
    }

    /// Total number of `publish` calls.
    pub fn publish_count(&self) -> usize {
        self.publishes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<BufferId, Vec<Diagnostic>>> {
        self.published.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DiagnosticsSink for MemorySink {
    fn publish(&self, buffer: &BufferId, diagnostics: Vec<Diagnostic>) {
        self.lock().insert(buffer.clone(), diagnostics);
        self.publishes.fetch_add(1, Ordering::SeqCst);
    }

    fn clear(&self, buffer: &BufferId) {
        self.lock().remove(buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_replaces() {
        let sink = MemorySink::new();
        let id = BufferId::from("a.sh");

        sink.publish(&id, vec![Diagnostic::validator_failed("json", 1, "x")]);
        sink.publish(&id, Vec::new());

        assert_eq!(sink.get(&id), Some(Vec::new()));
        assert_eq!(sink.publish_count(), 2);

        sink.clear(&id);
        assert_eq!(sink.get(&id), None);
    }
}
