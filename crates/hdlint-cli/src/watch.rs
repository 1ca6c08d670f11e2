//! `hdlint watch`: keep shell scripts validated as they change on disk.
//!
//! Each watched script becomes a [`LiveDocument`] fed to the scheduler.
//! Filesystem events are funneled through a channel; a modified file is
//! re-read and, if its lines changed, reported as saved. New shell scripts
//! are opened and deleted ones closed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use hdlint_kernel::hdlint_types::{BufferId, Diagnostic};
use hdlint_kernel::{
    BufferEvent, BufferSource, DiagnosticsSink, Document, Engine, LiveDocument, Scheduler,
};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::cli::WatchArgs;
use crate::report::diagnostic_line;
use crate::shell;

/// Prints every published diagnostic set to stdout.
#[derive(Debug, Default)]
pub struct PrintSink;

impl DiagnosticsSink for PrintSink {
    fn publish(&self, buffer: &BufferId, diagnostics: Vec<Diagnostic>) {
        if diagnostics.is_empty() {
            println!("{buffer}: ok");
        }
        for diagnostic in &diagnostics {
            println!("{}", diagnostic_line(buffer.as_str(), diagnostic));
        }
    }

    fn clear(&self, buffer: &BufferId) {
        tracing::debug!("{}: no longer watched", buffer);
    }
}

/// The set of open scripts and the scheduler validating them.
pub struct Workspace {
    scheduler: Scheduler,
    open: HashMap<PathBuf, LiveDocument>,
}

impl Workspace {
    pub fn new(scheduler: Scheduler) -> Self {
        Self {
            scheduler,
            open: HashMap::new(),
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn is_open(&self, path: &Path) -> bool {
        self.open.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// Start tracking `path` with the given content.
    pub fn open(&mut self, path: PathBuf, text: &str) {
        let document = LiveDocument::new(Document::from_text(buffer_id(&path), 0, text));
        self.scheduler
            .notify(BufferEvent::Opened(Arc::new(document.clone())));
        self.open.insert(path, document);
    }

    /// React to a filesystem event for `path`.
    pub async fn refresh(&mut self, path: PathBuf) {
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => self.reload(path, &text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => self.close(&path),
            // Directories, unreadable or non-UTF-8 files.
            Err(e) => tracing::debug!("ignoring {}: {}", path.display(), e),
        }
    }

    /// Apply new on-disk content for `path`.
    pub fn reload(&mut self, path: PathBuf, text: &str) {
        let Some(document) = self.open.get(&path) else {
            if shell::is_shell_script(&path, text) {
                tracing::info!("watching new script {}", path.display());
                self.open(path, text);
            }
            return;
        };

        let fresh = Document::from_text(buffer_id(&path), 0, text);
        let changed = document.edit(|doc| {
            if doc.lines() == fresh.lines() {
                false
            } else {
                doc.set_text(text);
                true
            }
        });
        if changed {
            let source: Arc<dyn BufferSource> = Arc::new(document.clone());
            self.scheduler.notify(BufferEvent::Saved(source));
        }
    }

    /// Stop tracking `path`, if it was tracked.
    pub fn close(&mut self, path: &Path) {
        if self.open.remove(path).is_some() {
            self.scheduler
                .notify(BufferEvent::Closed(BufferId::new(buffer_id(path))));
        }
    }
}

fn buffer_id(path: &Path) -> String {
    path.display().to_string()
}

/// Run until interrupted.
pub async fn watch(args: WatchArgs) -> Result<ExitCode> {
    let config = args.config.resolve()?;
    let engine = Engine::with_defaults(config);
    let mut workspace = Workspace::new(Scheduler::new(engine, Arc::new(PrintSink)));

    let (event_tx, mut event_rx) = mpsc::channel::<PathBuf>(256);
    let mut watcher = create_watcher(event_tx)?;

    for root in &args.paths {
        let root = tokio::fs::canonicalize(root)
            .await
            .with_context(|| format!("cannot watch {}", root.display()))?;
        let mode = if root.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(&root, mode)
            .with_context(|| format!("failed to watch {}", root.display()))?;

        let files = shell::shell_files(&root)
            .with_context(|| format!("failed to list {}", root.display()))?;
        for file in files {
            match tokio::fs::read_to_string(&file).await {
                Ok(text) => workspace.open(file, &text),
                Err(e) => tracing::warn!("skipping {}: {}", file.display(), e),
            }
        }
    }

    tracing::info!("watching {} shell script(s)", workspace.len());

    loop {
        tokio::select! {
            Some(path) = event_rx.recv() => workspace.refresh(path).await,
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    workspace.scheduler().shutdown();
    Ok(ExitCode::SUCCESS)
}

fn create_watcher(event_tx: mpsc::Sender<PathBuf>) -> Result<RecommendedWatcher> {
    notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| match res {
        Ok(event) => {
            for path in event.paths {
                // Dropping a burst is fine: the next event re-reads the file.
                let _ = event_tx.try_send(path);
            }
        }
        Err(e) => tracing::warn!("file watcher error: {}", e),
    })
    .context("failed to create file watcher")
}
