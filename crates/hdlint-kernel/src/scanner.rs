//! Block scanner: finds tagged heredoc bodies in a buffer.
//!
//! A single pass over the lines with two states:
//!
//! ```text
//!            start marker (<<TAG)
//! ScanningForStart ───────────────────▶ ScanningForEnd(TAG)
//!        ▲                                    │
//!        └──────── terminator line (TAG) ─────┘
//!        └──── EOF: resume after the marker ──┘
//! ```
//!
//! Start lines are classified by hand rather than with one large pattern.
//! A start marker is `<<` (never the `<<<` here-string), an optional `-`,
//! optional blanks, an optional `'` or `"`, then a registered tag that is
//! not immediately followed by a word character. Whatever follows on the
//! line (closing quote, redirections, pipes, comments) is ignored.
//!
//! A terminator is a line whose trimmed content is exactly the tag.
//! An unterminated marker does not form a region; scanning resumes on the
//! line after it.

use hdlint_types::{BufferId, Region};

use crate::buffer::TextBuffer;
use crate::tags::TagRegistry;

/// A buffer that could not be scanned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("buffer {buffer} reports {line_count} lines but line {index} is missing")]
    MissingLine {
        buffer: BufferId,
        index: usize,
        line_count: usize,
    },
}

#[derive(Clone, Copy)]
enum State<'t> {
    ScanningForStart,
    ScanningForEnd { tag: &'t str, marker: usize },
}

/// Find every terminated heredoc region in `buffer`.
///
/// Regions come back sorted by `body_start` and never overlap.
pub fn scan<B>(buffer: &B, registry: &TagRegistry) -> Result<Vec<Region>, ScanError>
where
    B: TextBuffer + ?Sized,
{
    let tags = registry.tags();
    let count = buffer.line_count();
    let mut regions = Vec::new();
    let mut state = State::ScanningForStart;
    let mut index = 0;

    while index < count {
        let line = buffer.line(index).ok_or_else(|| ScanError::MissingLine {
            buffer: buffer.id().clone(),
            index,
            line_count: count,
        })?;

        match state {
            State::ScanningForStart => {
                if let Some(tag) = match_start(line, &tags) {
                    state = State::ScanningForEnd { tag, marker: index };
                }
            }
            State::ScanningForEnd { tag, marker } => {
                if is_terminator(line, tag) {
                    regions.push(Region::new(tag, marker + 1, index));
                    state = State::ScanningForStart;
                }
            }
        }

        index += 1;

        if index == count {
            if let State::ScanningForEnd { tag, marker } = state {
                tracing::debug!("unterminated <<{} at line {} in {}", tag, marker + 1, buffer.id());
                index = marker + 1;
                state = State::ScanningForStart;
            }
        }
    }

    Ok(regions)
}

/// Classify `line` as a heredoc start, returning the matched tag.
///
/// `tags` should be ordered longest first (see [`TagRegistry::tags`]).
/// Every `<<` on the line is tried left to right; the first that introduces
/// a registered tag wins.
pub fn match_start<'t>(line: &str, tags: &[&'t str]) -> Option<&'t str> {
    let bytes = line.as_bytes();
    let mut from = 0;

    while let Some(offset) = line.get(from..).and_then(|rest| rest.find("<<")) {
        let at = from + offset;
        from = at + 1;

        // Part of a `<<<` here-string.
        if at > 0 && bytes[at - 1] == b'<' {
            continue;
        }
        let mut pos = at + 2;
        if bytes.get(pos) == Some(&b'<') {
            continue;
        }

        if bytes.get(pos) == Some(&b'-') {
            pos += 1;
        }
        while matches!(bytes.get(pos), Some(b' ' | b'\t')) {
            pos += 1;
        }
        if matches!(bytes.get(pos), Some(b'\'' | b'"')) {
            pos += 1;
        }

        if let Some(tag) = tag_at(&bytes[pos..], tags) {
            return Some(tag);
        }
    }

    None
}

/// Whether `line` terminates a heredoc tagged `tag`.
pub fn is_terminator(line: &str, tag: &str) -> bool {
    line.trim() == tag
}

fn tag_at<'t>(rest: &[u8], tags: &[&'t str]) -> Option<&'t str> {
    tags.iter().copied().find(|tag| {
        rest.starts_with(tag.as_bytes()) && !rest.get(tag.len()).is_some_and(|b| is_word_byte(*b))
    })
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
