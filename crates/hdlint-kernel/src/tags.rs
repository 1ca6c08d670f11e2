//! Tag registry: heredoc tag → validator key.
//!
//! Tags are matched exactly and case-sensitively. Several tags may route to
//! the same validator (`YAML` and `YML` both go to `yaml`).

use std::collections::HashMap;

/// Built-in tag table.
pub const DEFAULT_TAGS: &[(&str, &str)] = &[
    ("JSON", "json"),
    ("YAML", "yaml"),
    ("YML", "yaml"),
    ("XML", "xml"),
    ("PLIST", "xml"),
    ("PYTHON", "python"),
    ("PY", "python"),
];

/// Registry of recognised heredoc tags.
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    tags: HashMap<String, String>,
}

impl TagRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding [`DEFAULT_TAGS`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (tag, key) in DEFAULT_TAGS {
            registry.insert(*tag, *key);
        }
        registry
    }

    /// Route `tag` to validator `key`, replacing any previous mapping.
    pub fn insert(&mut self, tag: impl Into<String>, key: impl Into<String>) {
        self.tags.insert(tag.into(), key.into());
    }

    /// Validator key for `tag`, if any.
    pub fn lookup(&self, tag: &str) -> Option<&str> {
        self.tags.get(tag).map(String::as_str)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    /// All tags, longest first (ties broken alphabetically).
    ///
    /// The scanner walks this list so that `PYTHON` wins over `PY` when both
    /// could start at the same column.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<_> = self.tags.keys().map(String::as_str).collect();
        tags.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
