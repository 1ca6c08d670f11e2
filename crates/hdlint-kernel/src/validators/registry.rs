//! Validators keyed by the name tags map to.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::Validator;

/// The dispatch table: one validator per key.
#[derive(Default, Clone)]
pub struct ValidatorRegistry {
    validators: BTreeMap<String, Arc<dyn Validator>>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `validator` under [`Validator::key`], returning the one it
    /// replaced.
    pub fn register(&mut self, validator: impl Validator + 'static) -> Option<Arc<dyn Validator>> {
        self.register_arc(Arc::new(validator))
    }

    /// Like [`register`](Self::register), for a validator the caller keeps a
    /// handle to.
    pub fn register_arc(&mut self, validator: Arc<dyn Validator>) -> Option<Arc<dyn Validator>> {
        let key = validator.key().to_string();
        let replaced = self.validators.insert(key, validator);
        if let Some(old) = &replaced {
            tracing::debug!("validator {} replaced", old.key());
        }
        replaced
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn Validator>> {
        self.validators.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.validators.contains_key(key)
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        self.validators.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.validators.keys()).finish()
    }
}
