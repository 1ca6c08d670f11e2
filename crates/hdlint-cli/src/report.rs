//! Output formatting.

use hdlint_kernel::hdlint_types::{Diagnostic, Region};
use serde::Serialize;

/// Diagnostics for one checked file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl FileReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// `path:line:col: severity: [heredoc:key] message`, 1-based.
pub fn diagnostic_line(path: &str, diagnostic: &Diagnostic) -> String {
    let start = diagnostic.range.start;
    format!(
        "{}:{}:{}: {}: {}",
        path,
        u64::from(start.line) + 1,
        u64::from(start.character) + 1,
        diagnostic.severity,
        diagnostic
    )
}

/// `path:start-end TAG (key)`, 1-based marker and terminator lines.
pub fn region_line(path: &str, region: &Region, key: &str) -> String {
    format!(
        "{}:{}-{} {} ({})",
        path,
        region.marker_line() + 1,
        region.terminator_line() + 1,
        region.tag,
        key
    )
}
