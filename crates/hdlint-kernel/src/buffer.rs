//! Read-only views of text buffers.
//!
//! The kernel never mutates a buffer. Hosts hand it either a [`TextBuffer`]
//! (a fixed view, used by one-shot validation) or a [`BufferSource`] (a live
//! handle the scheduler snapshots at the moment a pass starts).

use std::sync::{Arc, PoisonError, RwLock};

use hdlint_types::BufferId;

/// A line-addressable buffer with a version counter.
pub trait TextBuffer: Send + Sync {
    /// Buffer identity.
    fn id(&self) -> &BufferId;

    /// Monotonic version, bumped on every mutation.
    fn version(&self) -> u64;

    /// Number of lines.
    fn line_count(&self) -> usize;

    /// Text of line `index`, without its terminator.
    fn line(&self, index: usize) -> Option<&str>;
}

/// A live buffer the scheduler can re-read at any time.
pub trait BufferSource: Send + Sync {
    fn id(&self) -> BufferId;

    /// Current version without copying the content.
    fn current_version(&self) -> u64;

    /// A fixed view of the current content, unaffected by later edits.
    fn snapshot(&self) -> Box<dyn TextBuffer>;
}

/// An owned, line-split buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: BufferId,
    version: u64,
    lines: Vec<String>,
}

impl Document {
    /// Create a document from pre-split lines.
    pub fn new(id: impl Into<BufferId>, version: u64, lines: Vec<String>) -> Self {
        Self {
            id: id.into(),
            version,
            lines,
        }
    }

    /// Create a document by splitting `text` on `\n`.
    ///
    /// A trailing `\r` is stripped from each line so CRLF files scan the
    /// same as LF ones.
    pub fn from_text(id: impl Into<BufferId>, version: u64, text: &str) -> Self {
        Self::new(id, version, split_lines(text))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Replace the whole content and bump the version.
    pub fn set_text(&mut self, text: &str) {
        self.lines = split_lines(text);
        self.version += 1;
    }

    /// Replace one line and bump the version. Out-of-range indices are ignored.
    pub fn replace_line(&mut self, index: usize, text: impl Into<String>) {
        if let Some(line) = self.lines.get_mut(index) {
            *line = text.into();
            self.version += 1;
        }
    }

    /// Insert a line before `index` (clamped to the end) and bump the version.
    pub fn insert_line(&mut self, index: usize, text: impl Into<String>) {
        let index = index.min(self.lines.len());
        self.lines.insert(index, text.into());
        self.version += 1;
    }
}

impl TextBuffer for Document {
    fn id(&self) -> &BufferId {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

/// A shared, editable document.
///
/// Cloning shares the same underlying buffer.
#[derive(Debug, Clone)]
pub struct LiveDocument {
    id: BufferId,
    inner: Arc<RwLock<Document>>,
}

impl LiveDocument {
    pub fn new(document: Document) -> Self {
        Self {
            id: document.id.clone(),
            inner: Arc::new(RwLock::new(document)),
        }
    }

    /// Apply an edit. Versions are bumped by the `Document` mutators.
    pub fn edit<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        let mut doc = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut doc)
    }
}

impl BufferSource for LiveDocument {
    fn id(&self) -> BufferId {
        self.id.clone()
    }

    fn current_version(&self) -> u64 {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .version
    }

    fn snapshot(&self) -> Box<dyn TextBuffer> {
        let doc = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Box::new(doc.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_text_strips_carriage_returns() {
        let doc = Document::from_text("a.sh", 1, "cat <<JSON\r\n{}\r\nJSON\r\n");
        assert_eq!(doc.line(0), Some("cat <<JSON"));
        assert_eq!(doc.line(2), Some("JSON"));
        // Trailing newline yields a final empty line.
        assert_eq!(doc.line_count(), 4);
        assert_eq!(doc.line(3), Some(""));
    }

    #[test]
    fn mutations_bump_version() {
        let mut doc = Document::from_text("a.sh", 1, "one\ntwo");
        doc.replace_line(1, "TWO");
        assert_eq!(doc.version(), 2);
        doc.insert_line(99, "three");
        assert_eq!(doc.version(), 3);
        assert_eq!(doc.lines(), ["one", "TWO", "three"]);
        doc.set_text("x");
        assert_eq!(doc.version(), 4);
    }

    #[test]
    fn replace_out_of_range_is_ignored() {
        let mut doc = Document::from_text("a.sh", 5, "one");
        doc.replace_line(3, "nope");
        assert_eq!(doc.version(), 5);
    }

    #[test]
    fn live_document_snapshots_latest_content() {
        let live = LiveDocument::new(Document::from_text("a.sh", 1, "old"));
        let before = live.snapshot();
        live.edit(|d| d.set_text("new"));
        let after = live.snapshot();

        assert_eq!((before.version(), before.line(0)), (1, Some("old")));
        assert_eq!((after.version(), after.line(0)), (2, Some("new")));
        assert_eq!(live.current_version(), 2);
        assert_eq!(BufferSource::id(&live), BufferId::from("a.sh"));
    }
}
