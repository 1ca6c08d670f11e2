//! Diagnostics in both coordinate spaces.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::position::Range;

/// Severity level, ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

impl Severity {
    /// Map an LSP numeric severity (1 = error … 4 = hint).
    ///
    /// Anything unrecognised is treated as a hint.
    pub fn from_lsp(value: u8) -> Self {
        match value {
            1 => Severity::Error,
            2 => Severity::Warning,
            3 => Severity::Information,
            _ => Severity::Hint,
        }
    }

    /// The LSP numeric severity.
    pub fn to_lsp(self) -> u8 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Information => 3,
            Severity::Hint => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Information => "info",
            Severity::Hint => "hint",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What produced a diagnostic.
///
/// A skipped region is its own outcome class, reported at
/// [`Severity::Information`]. It is never an error or a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticCode {
    /// The validator found a syntax problem in the body.
    Syntax,
    /// The body exceeded the size ceiling; the validator was not run.
    SkippedTooLarge,
    /// The validator itself failed (error or panic).
    ValidatorFailed,
}

/// A diagnostic as reported by a validator, relative to the region body.
///
/// `range` is optional because validators are black boxes: a result with no
/// position cannot be placed and is dropped when mapped to the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalDiagnostic {
    pub message: String,
    pub severity: Severity,
    pub range: Option<Range>,
}

impl LocalDiagnostic {
    pub fn new(severity: Severity, message: impl Into<String>, range: Range) -> Self {
        Self {
            message: message.into(),
            severity,
            range: Some(range),
        }
    }

    /// An error-level syntax diagnostic.
    pub fn error(message: impl Into<String>, range: Range) -> Self {
        Self::new(Severity::Error, message, range)
    }

    /// A diagnostic with no usable position.
    pub fn unpositioned(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity,
            range: None,
        }
    }
}

/// A diagnostic in buffer-global coordinates, ready for publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    pub severity: Severity,
    pub range: Range,
    /// `heredoc:<validator key>`.
    pub source: String,
    pub code: DiagnosticCode,
}

impl Diagnostic {
    /// The `source` string for a validator key.
    pub fn source_for(key: &str) -> String {
        format!("heredoc:{key}")
    }

    /// Informational marker for a body that was too large to validate.
    pub fn skipped_too_large(key: &str, body_start: u32) -> Self {
        Self {
            message: "skipped validation (exceeds size limit)".to_string(),
            severity: Severity::Information,
            range: Range::line_start(body_start),
            source: Self::source_for(key),
            code: DiagnosticCode::SkippedTooLarge,
        }
    }

    /// Error anchored at the region start for a validator that failed.
    pub fn validator_failed(key: &str, body_start: u32, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
            range: Range::line_start(body_start),
            source: Self::source_for(key),
            code: DiagnosticCode::ValidatorFailed,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.source, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, Severity::Error)]
    #[case(2, Severity::Warning)]
    #[case(3, Severity::Information)]
    #[case(4, Severity::Hint)]
    #[case(0, Severity::Hint)]
    #[case(9, Severity::Hint)]
    fn lsp_severity_mapping(#[case] value: u8, #[case] expected: Severity) {
        assert_eq!(Severity::from_lsp(value), expected);
    }

    #[test]
    fn skipped_is_informational_not_error() {
        let d = Diagnostic::skipped_too_large("json", 7);
        assert_eq!(d.severity, Severity::Information);
        assert_eq!(d.code, DiagnosticCode::SkippedTooLarge);
        assert_eq!(d.range, Range::line_start(7));
        assert!(!d.is_error());
    }

    #[test]
    fn display_carries_source_prefix() {
        let d = Diagnostic::validator_failed("yaml", 2, "boom");
        assert_eq!(d.to_string(), "[heredoc:yaml] boom");
    }

    #[test]
    fn code_serializes_kebab_case() {
        let json = serde_json::to_string(&DiagnosticCode::SkippedTooLarge).unwrap();
        assert_eq!(json, r#""skipped-too-large""#);
    }
}
