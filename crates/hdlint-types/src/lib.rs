//! hdlint-types: Pure data types shared across hdlint crates.
//!
//! Nothing in here performs I/O or knows about validators. The types come in
//! two coordinate flavours:
//!
//! - **Region-local** ([`LocalDiagnostic`]): line 0 is the first line of a
//!   heredoc body, as reported by a validator.
//! - **Buffer-global** ([`Diagnostic`]): line 0 is the first line of the whole
//!   script. Only the kernel's mapper produces these from local ones.

mod diagnostic;
mod position;
mod region;

pub use diagnostic::{Diagnostic, DiagnosticCode, LocalDiagnostic, Severity};
pub use position::{Position, Range};
pub use region::{BufferId, Region};
