//! Line/character positions and ranges.

use serde::{Deserialize, Serialize};

/// A zero-based line/character position.
///
/// Field order matters: the derived `Ord` compares by line first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }

    /// Shift this position down by `lines`, keeping the character offset.
    pub fn offset_lines(self, lines: u32) -> Self {
        Self {
            line: self.line.saturating_add(lines),
            character: self.character,
        }
    }
}

/// A half-open span between two positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A zero-width range at the start of `line`.
    pub const fn line_start(line: u32) -> Self {
        let at = Position::new(line, 0);
        Self { start: at, end: at }
    }

    /// A range covering a single character. At `u32::MAX` the range is empty.
    pub const fn single_char(line: u32, character: u32) -> Self {
        Self {
            start: Position::new(line, character),
            end: Position::new(line, character.saturating_add(1)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Shift both ends down by `lines`.
    pub fn offset_lines(self, lines: u32) -> Self {
        Self {
            start: self.start.offset_lines(lines),
            end: self.end.offset_lines(lines),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_order_by_line_then_character() {
        assert!(Position::new(1, 9) < Position::new(2, 0));
        assert!(Position::new(2, 0) < Position::new(2, 1));
    }

    #[test]
    fn single_char_saturates() {
        let range = Range::single_char(3, u32::MAX);
        assert_eq!(range.start, Position::new(3, u32::MAX));
        assert_eq!(range.end, Position::new(3, u32::MAX));
        assert!(range.start <= range.end);
    }

    #[test]
    fn offset_keeps_characters() {
        let range = Range::new(Position::new(0, 4), Position::new(2, 7));
        let moved = range.offset_lines(10);
        assert_eq!(moved.start, Position::new(10, 4));
        assert_eq!(moved.end, Position::new(12, 7));
    }

    #[test]
    fn offset_saturates() {
        let pos = Position::new(u32::MAX - 1, 3).offset_lines(5);
        assert_eq!(pos.line, u32::MAX);
    }

    #[test]
    fn line_start_is_empty() {
        assert!(Range::line_start(4).is_empty());
        assert!(!Range::single_char(4, 0).is_empty());
    }

    #[test]
    fn serializes_like_lsp() {
        let json = serde_json::to_string(&Range::single_char(1, 2)).unwrap();
        assert_eq!(
            json,
            r#"{"start":{"line":1,"character":2},"end":{"line":1,"character":3}}"#
        );
    }
}
