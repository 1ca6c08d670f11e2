//! The engine: owns the registries and runs scan → dispatch.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                        Engine                         │
//! │  ┌─────────────┐  ┌───────────────────┐  ┌─────────┐  │
//! │  │ TagRegistry │  │ ValidatorRegistry │  │ Config  │  │
//! │  │ (tag → key) │  │ (key → validator) │  │         │  │
//! │  └─────────────┘  └───────────────────┘  └─────────┘  │
//! │          scanner ──▶ dispatcher ──▶ mapper            │
//! └──────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use hdlint_types::{Diagnostic, Region};

use crate::buffer::TextBuffer;
use crate::config::ValidationConfig;
use crate::dispatcher::Dispatcher;
use crate::scanner::{self, ScanError};
use crate::tags::TagRegistry;
use crate::validators::{
    JsonValidator, PythonValidator, ValidatorRegistry, XmlValidator, YamlValidator,
};

/// Scanner and dispatcher wired to one set of registries and settings.
#[derive(Debug, Clone)]
pub struct Engine {
    tags: Arc<TagRegistry>,
    validators: Arc<ValidatorRegistry>,
    config: Arc<ValidationConfig>,
    dispatcher: Dispatcher,
}

impl Engine {
    /// Create an engine from explicit registries.
    pub fn new(tags: TagRegistry, validators: ValidatorRegistry, config: ValidationConfig) -> Self {
        let tags = Arc::new(tags);
        let validators = Arc::new(validators);
        let config = Arc::new(config);
        let dispatcher = Dispatcher::new(tags.clone(), validators.clone(), config.clone());
        Self {
            tags,
            validators,
            config,
            dispatcher,
        }
    }

    /// Create an engine with the default tags and the built-in validators.
    pub fn with_defaults(config: ValidationConfig) -> Self {
        let validators = default_validators(&config);
        Self::new(TagRegistry::with_defaults(), validators, config)
    }

    pub fn tags(&self) -> &TagRegistry {
        &self.tags
    }

    pub fn validators(&self) -> &ValidatorRegistry {
        &self.validators
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Find the heredoc regions of `buffer`.
    pub fn scan<B>(&self, buffer: &B) -> Result<Vec<Region>, ScanError>
    where
        B: TextBuffer + ?Sized,
    {
        scanner::scan(buffer, &self.tags)
    }

    /// Validate already-scanned regions.
    pub async fn dispatch<B>(&self, buffer: &B, regions: &[Region]) -> Vec<Diagnostic>
    where
        B: TextBuffer + ?Sized,
    {
        self.dispatcher.dispatch(buffer, regions).await
    }

    /// Scan and validate `buffer`.
    ///
    /// Only a scanner failure is returned as an error; everything that goes
    /// wrong inside a region becomes a diagnostic.
    pub async fn validate<B>(&self, buffer: &B) -> Result<Vec<Diagnostic>, ScanError>
    where
        B: TextBuffer + ?Sized,
    {
        let regions = self.scan(buffer)?;
        tracing::debug!("{}: {} heredoc region(s)", buffer.id(), regions.len());
        Ok(self.dispatch(buffer, &regions).await)
    }
}

/// The four built-in validators, with Python using the configured interpreter.
pub fn default_validators(config: &ValidationConfig) -> ValidatorRegistry {
    let mut registry = ValidatorRegistry::new();
    registry.register(JsonValidator);
    registry.register(YamlValidator);
    registry.register(XmlValidator);
    registry.register(PythonValidator::new(config.python.clone()));
    registry
}
