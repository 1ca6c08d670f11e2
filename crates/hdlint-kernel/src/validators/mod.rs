//! Validators for embedded documents.
//!
//! Each validator is a black box keyed by name: body text in, region-local
//! diagnostics out. The dispatcher never looks inside.
//!
//! | Key      | Implementation                                      |
//! |----------|-----------------------------------------------------|
//! | `json`   | [`JsonValidator`] (serde_json)                      |
//! | `yaml`   | [`YamlValidator`] (serde_yaml, multi-document)      |
//! | `xml`    | [`XmlValidator`] (quick-xml + element stack)        |
//! | `python` | [`PythonValidator`] (external `ast.parse` process)  |

mod json;
mod python;
mod registry;
mod xml;
mod yaml;

use async_trait::async_trait;
use hdlint_types::{LocalDiagnostic, Position};

pub use json::JsonValidator;
pub use python::{parse_reply, CheckReply, PythonValidator, DEFAULT_INTERPRETER};
pub use registry::ValidatorRegistry;
pub use xml::XmlValidator;
pub use yaml::YamlValidator;

/// A validator that could not produce a result.
///
/// This is distinct from "the body has syntax errors", which is a successful
/// result carrying diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum ValidatorError {
    #[error("{0}")]
    Failed(String),

    #[error("validator I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Syntax checker for one embedded language.
#[async_trait]
pub trait Validator: Send + Sync {
    /// Registry key (`json`, `yaml`, ...).
    fn key(&self) -> &str;

    /// Check `text` and report problems relative to its first line.
    async fn validate(&self, text: &str) -> Result<Vec<LocalDiagnostic>, ValidatorError>;
}

/// Byte offset of a zero-based line/column pair, clamped to the text.
pub(crate) fn offset_of(text: &str, line: usize, column: usize) -> usize {
    let line_start = if line == 0 {
        0
    } else {
        text.match_indices('\n')
            .nth(line - 1)
            .map(|(i, _)| i + 1)
            .unwrap_or(text.len())
    };
    let line_end = text[line_start..]
        .find('\n')
        .map(|i| line_start + i)
        .unwrap_or(text.len());
    (line_start + column).min(line_end)
}

/// Zero-based position of a byte offset; the character is counted in chars.
pub(crate) fn position_at(text: &str, offset: usize) -> Position {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = &text[..offset];
    let line = before.matches('\n').count();
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let character = before[line_start..].chars().count();
    Position::new(to_u32(line), to_u32(character))
}

/// Strip the ` at line N column M...` location text parser errors append.
pub(crate) fn strip_location(message: &str) -> &str {
    match message.find(" at line ") {
        Some(i) => &message[..i],
        None => message,
    }
}

pub(crate) fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
