//! YAML well-formedness via serde_yaml.

use async_trait::async_trait;
use hdlint_types::{LocalDiagnostic, Range};
use serde::Deserialize;

use super::{strip_location, to_u32, Validator, ValidatorError};

/// Loads every document of a YAML stream, reporting the first failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlValidator;

#[async_trait]
impl Validator for YamlValidator {
    fn key(&self) -> &str {
        "yaml"
    }

    async fn validate(&self, text: &str) -> Result<Vec<LocalDiagnostic>, ValidatorError> {
        Ok(check(text).into_iter().collect())
    }
}

fn check(text: &str) -> Option<LocalDiagnostic> {
    for document in serde_yaml::Deserializer::from_str(text) {
        if let Err(err) = serde_yaml::Value::deserialize(document) {
            let (line, column) = err
                .location()
                .map(|loc| (loc.line().saturating_sub(1), loc.column().saturating_sub(1)))
                .unwrap_or((0, 0));
            let message = err.to_string();
            return Some(LocalDiagnostic::error(
                strip_location(&message),
                Range::single_char(to_u32(line), to_u32(column)),
            ));
        }
    }
    None
}
