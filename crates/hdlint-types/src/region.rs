//! Heredoc regions and buffer identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a text buffer (a file path or editor URI).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BufferId(String);

impl BufferId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BufferId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BufferId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A tagged heredoc body found in a buffer.
///
/// The body spans lines `[body_start, body_end)`: the line after the start
/// marker up to (not including) the terminator line. An empty body has
/// `body_start == body_end`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub tag: String,
    pub body_start: usize,
    pub body_end: usize,
}

impl Region {
    pub fn new(tag: impl Into<String>, body_start: usize, body_end: usize) -> Self {
        Self {
            tag: tag.into(),
            body_start,
            body_end,
        }
    }

    /// Number of body lines.
    pub fn body_len(&self) -> usize {
        self.body_end.saturating_sub(self.body_start)
    }

    pub fn is_empty(&self) -> bool {
        self.body_len() == 0
    }

    /// Body line indices.
    pub fn lines(&self) -> std::ops::Range<usize> {
        self.body_start..self.body_end
    }

    /// Line index of the start marker (`<<TAG`).
    pub fn marker_line(&self) -> usize {
        self.body_start.saturating_sub(1)
    }

    /// Line index of the terminator.
    pub fn terminator_line(&self) -> usize {
        self.body_end
    }

    /// Whether two regions share any body line.
    pub fn overlaps(&self, other: &Region) -> bool {
        self.body_start < other.body_end && other.body_start < self.body_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body() {
        let r = Region::new("JSON", 3, 3);
        assert!(r.is_empty());
        assert_eq!(r.body_len(), 0);
        assert_eq!(r.marker_line(), 2);
        assert_eq!(r.terminator_line(), 3);
    }

    #[test]
    fn overlap_is_half_open() {
        let a = Region::new("JSON", 1, 3);
        let b = Region::new("XML", 3, 5);
        let c = Region::new("XML", 2, 4);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
    }

    #[test]
    fn buffer_id_is_transparent() {
        let id = BufferId::from("file:///tmp/a.sh");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""file:///tmp/a.sh""#);
        assert_eq!(id.to_string(), "file:///tmp/a.sh");
    }
}
