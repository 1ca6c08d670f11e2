//! hdlint-kernel: validation for documents embedded in shell heredocs.
//!
//! This crate provides:
//!
//! - **Scanner**: finds `<<TAG … TAG` regions for registered tags
//! - **Validators**: JSON, YAML, XML in-process; Python via an interpreter
//! - **Dispatcher**: routes regions to validators and maps their
//!   diagnostics back onto buffer lines
//! - **Scheduler**: debounced, cache-aware revalidation of open buffers
//!
//! ```text
//! buffer ──▶ scanner ──▶ [Region] ──▶ dispatcher ──▶ validator(body)
//!                                          │
//!                                          ▼
//!                           mapper ──▶ [Diagnostic] ──▶ sink
//! ```

pub mod buffer;
pub mod cache;
pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod mapper;
pub mod scanner;
pub mod scheduler;
pub mod tags;
pub mod validators;

pub use hdlint_types;

pub use buffer::{BufferSource, Document, LiveDocument, TextBuffer};
pub use cache::VersionCache;
pub use config::ValidationConfig;
pub use dispatcher::Dispatcher;
pub use engine::{default_validators, Engine};
pub use scanner::{scan, ScanError};
pub use scheduler::{
    BufferEvent, DiagnosticsSink, MemorySink, PassOutcome, PassReport, PassState, Scheduler,
};
pub use tags::TagRegistry;
pub use validators::{Validator, ValidatorError, ValidatorRegistry};
