//! Validation dispatcher: runs each region through its validator.
//!
//! Per region:
//!
//! 1. Resolve tag → key → validator; unknown, unregistered, or disabled keys
//!    are skipped without a trace in the output.
//! 2. Join the body lines with `\n`.
//! 3. Bodies over `max_bytes` get one informational "skipped" diagnostic.
//! 4. Otherwise the validator runs in its own task. An error or a panic
//!    becomes one error diagnostic at the body start.
//! 5. Successful results are mapped into buffer coordinates.
//!
//! All regions run concurrently; the result waits for every one of them and
//! keeps region order.

use std::sync::Arc;

use hdlint_types::{Diagnostic, LocalDiagnostic, Region};
use tokio::task::{JoinError, JoinHandle};

use crate::buffer::TextBuffer;
use crate::config::ValidationConfig;
use crate::mapper;
use crate::tags::TagRegistry;
use crate::validators::{to_u32, ValidatorError, ValidatorRegistry};

type ValidationTask = JoinHandle<Result<Vec<LocalDiagnostic>, ValidatorError>>;

enum Outcome {
    Done(Diagnostic),
    Running {
        key: String,
        body_start: usize,
        task: ValidationTask,
    },
}

/// Routes regions to validators.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tags: Arc<TagRegistry>,
    validators: Arc<ValidatorRegistry>,
    config: Arc<ValidationConfig>,
}

impl Dispatcher {
    pub fn new(
        tags: Arc<TagRegistry>,
        validators: Arc<ValidatorRegistry>,
        config: Arc<ValidationConfig>,
    ) -> Self {
        Self {
            tags,
            validators,
            config,
        }
    }

    /// Validate `regions` of `buffer`, returning buffer-global diagnostics.
    ///
    /// Never fails: every per-region problem is turned into a diagnostic.
    pub async fn dispatch<B>(&self, buffer: &B, regions: &[Region]) -> Vec<Diagnostic>
    where
        B: TextBuffer + ?Sized,
    {
        let mut outcomes = Vec::with_capacity(regions.len());

        for region in regions {
            let Some(key) = self.tags.lookup(&region.tag) else {
                continue;
            };
            if !self.config.is_enabled(key) {
                tracing::trace!("skipping <<{}: validator {} disabled", region.tag, key);
                continue;
            }
            let Some(validator) = self.validators.get(key) else {
                tracing::trace!("skipping <<{}: no validator registered for {}", region.tag, key);
                continue;
            };

            let body = body_text(buffer, region);
            if body.len() > self.config.max_bytes {
                tracing::debug!(
                    "<<{} at line {} is {} bytes, over the {} byte limit",
                    region.tag,
                    region.body_start,
                    body.len(),
                    self.config.max_bytes
                );
                outcomes.push(Outcome::Done(Diagnostic::skipped_too_large(
                    key,
                    to_u32(region.body_start),
                )));
                continue;
            }

            let task = tokio::spawn(async move { validator.validate(&body).await });
            outcomes.push(Outcome::Running {
                key: key.to_string(),
                body_start: region.body_start,
                task,
            });
        }

        let mut diagnostics = Vec::new();
        for outcome in outcomes {
            match outcome {
                Outcome::Done(diagnostic) => diagnostics.push(diagnostic),
                Outcome::Running {
                    key,
                    body_start,
                    task,
                } => match task.await {
                    Ok(Ok(locals)) => diagnostics.extend(
                        locals
                            .into_iter()
                            .filter_map(|local| mapper::to_global(body_start, &key, local)),
                    ),
                    Ok(Err(e)) => {
                        tracing::warn!("{} validator failed at line {}: {}", key, body_start, e);
                        diagnostics.push(Diagnostic::validator_failed(
                            &key,
                            to_u32(body_start),
                            e.to_string(),
                        ));
                    }
                    Err(e) => {
                        let message = join_failure(e);
                        tracing::warn!("{} validator task at line {}: {}", key, body_start, message);
                        diagnostics.push(Diagnostic::validator_failed(
                            &key,
                            to_u32(body_start),
                            message,
                        ));
                    }
                },
            }
        }

        diagnostics
    }
}

/// Body lines joined with `\n`.
pub fn body_text<B>(buffer: &B, region: &Region) -> String
where
    B: TextBuffer + ?Sized,
{
    region
        .lines()
        .map(|i| buffer.line(i).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\n")
}

fn join_failure(err: JoinError) -> String {
    if err.is_cancelled() {
        return "validator task was cancelled".to_string();
    }
    let panic = err.into_panic();
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("validator panicked: {detail}")
}
