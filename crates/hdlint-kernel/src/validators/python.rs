//! Python syntax checking through an external interpreter.
//!
//! The body is piped to `python3 -c <script>`, which runs `ast.parse` and
//! answers with a single line:
//!
//! ```text
//! OK
//! ERROR:<line>:<column>:<message>
//! ```
//!
//! Line and column are 1-based. A missing interpreter, a non-zero exit, or
//! output we don't recognise all resolve to "no diagnostics".

use std::process::Stdio;

use async_trait::async_trait;
use hdlint_types::{LocalDiagnostic, Range};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{Validator, ValidatorError};

/// Interpreter used when none is configured.
pub const DEFAULT_INTERPRETER: &str = "python3";

const CHECK_SCRIPT: &str = r#"
import ast
import sys
try:
    ast.parse(sys.stdin.read())
    print("OK")
except SyntaxError as e:
    print(f"ERROR:{e.lineno or 1}:{e.offset or 1}:{e.msg or 'Invalid Python syntax'}")
except Exception as e:
    print(f"ERROR:1:1:{e}")
"#;

/// Runs Python's own parser over the body.
#[derive(Debug, Clone)]
pub struct PythonValidator {
    interpreter: String,
}

impl Default for PythonValidator {
    fn default() -> Self {
        Self::new(DEFAULT_INTERPRETER)
    }
}

impl PythonValidator {
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }
}

#[async_trait]
impl Validator for PythonValidator {
    fn key(&self) -> &str {
        "python"
    }

    async fn validate(&self, text: &str) -> Result<Vec<LocalDiagnostic>, ValidatorError> {
        let mut child = match Command::new(&self.interpreter)
            .arg("-c")
            .arg(CHECK_SCRIPT)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!("python checker unavailable ({}): {}", self.interpreter, e);
                return Ok(Vec::new());
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            // An early exit closes the pipe; the exit status covers it.
            if let Err(e) = stdin.write_all(text.as_bytes()).await {
                tracing::debug!("python checker stdin write failed: {}", e);
            }
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            tracing::debug!(
                "python checker exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(Vec::new());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        match parse_reply(stdout.trim()) {
            CheckReply::Ok => Ok(Vec::new()),
            CheckReply::Error(diagnostic) => Ok(vec![diagnostic]),
            CheckReply::Unrecognized => {
                tracing::debug!("python checker gave unexpected output: {:?}", stdout);
                Ok(Vec::new())
            }
        }
    }
}

/// One line of the checker protocol, decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckReply {
    Ok,
    Error(LocalDiagnostic),
    Unrecognized,
}

/// Decode `OK` or `ERROR:<line>:<column>:<message>`.
///
/// Positions are converted to zero-based, clamped at zero and capped at
/// `u32::MAX - 1` so the one-character range stays non-empty. The message
/// may itself contain colons.
pub fn parse_reply(line: &str) -> CheckReply {
    if line == "OK" {
        return CheckReply::Ok;
    }
    let Some(rest) = line.strip_prefix("ERROR:") else {
        return CheckReply::Unrecognized;
    };

    let mut parts = rest.splitn(3, ':');
    let line_no = parse_one_based(parts.next());
    let column = parse_one_based(parts.next());
    let message = match parts.next() {
        Some(m) if !m.is_empty() => m,
        _ => "Invalid Python syntax",
    };

    CheckReply::Error(LocalDiagnostic::error(
        message,
        Range::single_char(line_no, column),
    ))
}

fn parse_one_based(part: Option<&str>) -> u32 {
    const MAX: u32 = u32::MAX - 1;
    part.and_then(|p| p.trim().parse::<i64>().ok())
        .map(|n| u32::try_from(n.saturating_sub(1).max(0)).map_or(MAX, |v| v.min(MAX)))
        .unwrap_or(0)
}
