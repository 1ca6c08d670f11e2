//! Coordinate mapper: region-local diagnostics → buffer-global ones.
//!
//! Body lines are copied verbatim from the buffer, so only line numbers move;
//! character offsets are already correct for the buffer line.

use hdlint_types::{Diagnostic, DiagnosticCode, LocalDiagnostic};

/// Place a validator diagnostic in buffer coordinates.
///
/// Returns `None` when the validator gave no range: such a diagnostic cannot
/// be positioned and is dropped rather than pinned to a guessed location.
pub fn to_global(body_start: usize, key: &str, local: LocalDiagnostic) -> Option<Diagnostic> {
    let range = local.range?;
    let offset = u32::try_from(body_start).unwrap_or(u32::MAX);

    Some(Diagnostic {
        message: local.message,
        severity: local.severity,
        range: range.offset_lines(offset),
        source: Diagnostic::source_for(key),
        code: DiagnosticCode::Syntax,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdlint_types::{Position, Range, Severity};

    #[test]
    fn shifts_lines_keeps_characters() {
        let local = LocalDiagnostic::error(
            "bad",
            Range::new(Position::new(2, 5), Position::new(3, 1)),
        );
        let global = to_global(10, "json", local).unwrap();

        assert_eq!(global.range.start, Position::new(12, 5));
        assert_eq!(global.range.end, Position::new(13, 1));
        assert_eq!(global.source, "heredoc:json");
        assert_eq!(global.code, DiagnosticCode::Syntax);
        assert_eq!(global.message, "bad");
    }

    #[test]
    fn keeps_validator_severity() {
        let local = LocalDiagnostic::new(Severity::Warning, "meh", Range::single_char(0, 0));
        assert_eq!(to_global(1, "yaml", local).unwrap().severity, Severity::Warning);
    }

    #[test]
    fn unpositioned_is_dropped() {
        let local = LocalDiagnostic::unpositioned(Severity::Error, "somewhere");
        assert!(to_global(4, "xml", local).is_none());
    }

    #[test]
    fn every_local_line_lands_at_body_start_plus_line() {
        for body_start in [0usize, 1, 7, 250] {
            for line in 0u32..20 {
                let local = LocalDiagnostic::error("x", Range::single_char(line, 0));
                let global = to_global(body_start, "json", local).unwrap();
                assert_eq!(global.range.start.line as usize, body_start + line as usize);
            }
        }
    }
}
