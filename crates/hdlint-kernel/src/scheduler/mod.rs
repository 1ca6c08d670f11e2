//! Revalidation scheduler.
//!
//! Decides when a buffer gets a validation pass. Each tracked buffer is in
//! one of three states:
//!
//! ```text
//!   event (open/change/save/activate)        timer fires
//! Idle ─────────────────────────────▶ Pending ───────────▶ Running
//!  ▲             ▲  (restart timer)    │  ▲                   │
//!  │             └─────────────────────┘  └── event ──────────┤
//!  └──────────────────────── pass complete ───────────────────┘
//! ```
//!
//! - Events restart a debounce timer; a burst collapses into one pass.
//! - A natural pass reads the buffer when the timer fires, never earlier, and
//!   is skipped entirely if the cache says that version was already done.
//! - [`Scheduler::revalidate_now`] skips both the timer and the cache.
//! - A pass publishes only if the buffer still has the version it computed
//!   against and nothing newer was published. Otherwise its result is
//!   discarded; the newer event already scheduled a fresh pass.
//! - A scanner failure (a snapshot that cannot produce a line it claims to
//!   have) publishes nothing, leaving the previous set in place.
//!
//! Every finished pass is announced on [`Scheduler::subscribe`].

mod sink;

pub use sink::{DiagnosticsSink, MemorySink};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use hdlint_types::BufferId;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::buffer::{BufferSource, TextBuffer};
use crate::cache::VersionCache;
use crate::engine::Engine;

/// Capacity of the pass report channel.
const REPORT_CAPACITY: usize = 64;

/// Something happened to a buffer.
#[derive(Clone)]
pub enum BufferEvent {
    Opened(Arc<dyn BufferSource>),
    Changed(Arc<dyn BufferSource>),
    Saved(Arc<dyn BufferSource>),
    /// The buffer became the active/focused one.
    Activated(Arc<dyn BufferSource>),
    Closed(BufferId),
}

impl std::fmt::Debug for BufferEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferEvent::Opened(s) => f.debug_tuple("Opened").field(&s.id()).finish(),
            BufferEvent::Changed(s) => f.debug_tuple("Changed").field(&s.id()).finish(),
            BufferEvent::Saved(s) => f.debug_tuple("Saved").field(&s.id()).finish(),
            BufferEvent::Activated(s) => f.debug_tuple("Activated").field(&s.id()).finish(),
            BufferEvent::Closed(id) => f.debug_tuple("Closed").field(id).finish(),
        }
    }
}

/// Scheduling state of one buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PassState {
    #[default]
    Idle,
    /// A debounce timer is running.
    Pending,
    /// A pass is in flight.
    Running,
}

/// How a pass ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// Diagnostics were handed to the sink.
    Published { diagnostics: usize },
    /// The cache already had this version; nothing ran.
    Unchanged,
    /// The buffer moved on (or closed) while the pass ran; result dropped.
    Discarded,
    /// The scanner failed; previous diagnostics left untouched.
    Failed(String),
}

/// Announcement of a finished pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    pub buffer: BufferId,
    /// Version the pass looked at.
    pub version: u64,
    pub forced: bool,
    pub outcome: PassOutcome,
}

#[derive(Debug, Default)]
struct BufferEntry {
    state: PassState,
    /// Bumped on every scheduling event; a timer only fires if it still
    /// holds the latest generation.
    generation: u64,
    timer: Option<JoinHandle<()>>,
    /// Passes currently in flight (natural and forced).
    running: usize,
    /// Highest version handed to the sink.
    published: Option<u64>,
}

/// Debounced, cache-aware revalidation of open buffers.
///
/// Owns the engine, the version cache, and per-buffer timers. Dropping the
/// scheduler aborts pending timers.
pub struct Scheduler {
    inner: Arc<Inner>,
}

struct Inner {
    engine: Engine,
    sink: Arc<dyn DiagnosticsSink>,
    cache: VersionCache,
    buffers: Mutex<HashMap<BufferId, BufferEntry>>,
    debounce: Duration,
    reports: broadcast::Sender<PassReport>,
}

impl Scheduler {
    /// Create a scheduler using the engine's configured debounce interval.
    pub fn new(engine: Engine, sink: Arc<dyn DiagnosticsSink>) -> Self {
        let debounce = engine.config().debounce();
        Self::with_debounce(engine, sink, debounce)
    }

    pub fn with_debounce(engine: Engine, sink: Arc<dyn DiagnosticsSink>, debounce: Duration) -> Self {
        let (reports, _) = broadcast::channel(REPORT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                engine,
                sink,
                cache: VersionCache::new(),
                buffers: Mutex::new(HashMap::new()),
                debounce,
                reports,
            }),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.inner.engine
    }

    pub fn cache(&self) -> &VersionCache {
        &self.inner.cache
    }

    pub fn debounce(&self) -> Duration {
        self.inner.debounce
    }

    /// Receive a report for every finished pass.
    pub fn subscribe(&self) -> broadcast::Receiver<PassReport> {
        self.inner.reports.subscribe()
    }

    /// Current state of `buffer`, or `None` if it isn't tracked.
    pub fn state(&self, buffer: &BufferId) -> Option<PassState> {
        self.inner.lock_buffers().get(buffer).map(|entry| entry.state)
    }

    /// Feed a buffer event. Must be called from within a tokio runtime.
    pub fn notify(&self, event: BufferEvent) {
        tracing::trace!("buffer event: {:?}", event);
        match event {
            BufferEvent::Opened(source)
            | BufferEvent::Changed(source)
            | BufferEvent::Saved(source)
            | BufferEvent::Activated(source) => self.schedule(source),
            BufferEvent::Closed(id) => self.close(&id),
        }
    }

    /// Run a pass right now, ignoring the debounce timer and the cache.
    ///
    /// A pending natural pass is left alone; when it fires it will find the
    /// version cached (unless the buffer changed again) and skip.
    pub async fn revalidate_now(&self, source: Arc<dyn BufferSource>) -> PassReport {
        let id = source.id();
        self.inner.cache.remove(&id);
        {
            let mut buffers = self.inner.lock_buffers();
            let entry = buffers.entry(id.clone()).or_default();
            entry.state = PassState::Running;
            entry.running += 1;
        }

        let report = self.inner.run_pass(source.as_ref(), true).await;
        self.inner.finish(&id, &report);
        report
    }

    fn schedule(&self, source: Arc<dyn BufferSource>) {
        let id = source.id();
        let mut buffers = self.inner.lock_buffers();
        let entry = buffers.entry(id).or_default();

        if let Some(timer) = entry.timer.take() {
            timer.abort();
        }
        entry.generation += 1;
        if entry.running == 0 {
            entry.state = PassState::Pending;
        }

        let generation = entry.generation;
        let inner = Arc::clone(&self.inner);
        entry.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;
            inner.fire(source, generation).await;
        }));
    }

    fn close(&self, id: &BufferId) {
        if let Some(entry) = self.inner.lock_buffers().remove(id) {
            if let Some(timer) = entry.timer {
                timer.abort();
            }
        }
        self.inner.cache.remove(id);
        self.inner.sink.clear(id);
        tracing::debug!("{}: closed", id);
    }

    /// Abort all timers and forget every buffer.
    pub fn shutdown(&self) {
        let mut buffers = self.inner.lock_buffers();
        for (_, entry) in buffers.drain() {
            if let Some(timer) = entry.timer {
                timer.abort();
            }
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("debounce", &self.inner.debounce)
            .field("buffers", &self.inner.lock_buffers().len())
            .finish()
    }
}

impl Inner {
    fn lock_buffers(&self) -> MutexGuard<'_, HashMap<BufferId, BufferEntry>> {
        self.buffers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Debounce timer elapsed.
    async fn fire(&self, source: Arc<dyn BufferSource>, generation: u64) {
        let id = source.id();
        {
            let mut buffers = self.lock_buffers();
            let Some(entry) = buffers.get_mut(&id) else {
                return;
            };
            if entry.generation != generation {
                return;
            }
            entry.timer = None;
            entry.state = PassState::Running;
            entry.running += 1;
        }

        let report = self.run_pass(source.as_ref(), false).await;
        self.finish(&id, &report);
    }

    async fn run_pass(&self, source: &dyn BufferSource, forced: bool) -> PassReport {
        let id = source.id();

        if !forced {
            let version = source.current_version();
            if self.cache.is_current(&id, version) {
                tracing::debug!("{}: version {} already validated", id, version);
                return PassReport {
                    buffer: id,
                    version,
                    forced,
                    outcome: PassOutcome::Unchanged,
                };
            }
        }

        let snapshot = source.snapshot();
        let version = snapshot.version();
        tracing::debug!("{}: validating version {}{}", id, version, if forced { " (forced)" } else { "" });

        let outcome = match self.engine.validate(snapshot.as_ref()).await {
            Ok(diagnostics) => self.publish(source, version, diagnostics),
            Err(e) => {
                tracing::error!("{}: scan failed, keeping previous diagnostics: {}", id, e);
                PassOutcome::Failed(e.to_string())
            }
        };

        PassReport {
            buffer: id,
            version,
            forced,
            outcome,
        }
    }

    /// Hand diagnostics to the sink if they are still for the newest content.
    fn publish(
        &self,
        source: &dyn BufferSource,
        version: u64,
        diagnostics: Vec<hdlint_types::Diagnostic>,
    ) -> PassOutcome {
        let id = source.id();
        let mut buffers = self.lock_buffers();
        let Some(entry) = buffers.get_mut(&id) else {
            tracing::debug!("{}: closed during pass, dropping result", id);
            return PassOutcome::Discarded;
        };

        let current = source.current_version();
        if current != version || entry.published.is_some_and(|p| p > version) {
            tracing::debug!(
                "{}: dropping stale result for version {} (now {})",
                id,
                version,
                current
            );
            return PassOutcome::Discarded;
        }

        let count = diagnostics.len();
        entry.published = Some(version);
        self.sink.publish(&id, diagnostics);
        self.cache.set(&id, version);
        PassOutcome::Published { diagnostics: count }
    }

    fn finish(&self, id: &BufferId, report: &PassReport) {
        {
            let mut buffers = self.lock_buffers();
            if let Some(entry) = buffers.get_mut(id) {
                entry.running = entry.running.saturating_sub(1);
                if entry.running == 0 {
                    entry.state = if entry.timer.is_some() {
                        PassState::Pending
                    } else {
                        PassState::Idle
                    };
                }
            }
        }
        // No subscribers is fine.
        let _ = self.reports.send(report.clone());
    }
}
