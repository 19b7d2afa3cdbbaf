//! Text position and location types for source tracking.
//!
//! All offsets are measured in characters (Unicode scalar values) from the
//! start of the text, which is the unit the scanner advances in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text, measured as a character offset from the start.
pub type TextPos = u32;

/// A location attached to AST nodes, comments and whitespace.
///
/// `line` is 1-based. `index` is the character offset of the first character
/// (for a `start` location) or of the last character (for an `end` location).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub line: Option<u32>,
    pub index: TextPos,
}

impl Location {
    #[inline]
    pub fn new(line: u32, index: TextPos) -> Self {
        Self {
            line: Some(line),
            index,
        }
    }

    /// A location with no line information.
    #[inline]
    pub fn at_index(index: TextPos) -> Self {
        Self { line: None, index }
    }

    /// Return this location with its index passed through `f`.
    #[inline]
    pub fn map_index(self, f: impl FnOnce(TextPos) -> TextPos) -> Self {
        Self {
            line: self.line,
            index: f(self.index),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}@{}", line, self.index),
            None => write!(f, "@{}", self.index),
        }
    }
}

/// Line and column information derived from source text.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LineAndColumn {
    /// 1-based line number.
    pub line: u32,
    /// 0-based column in characters.
    pub column: u32,
}

/// A map from character offsets to lines, built from source text.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Character offsets of the start of each line.
    line_starts: Vec<TextPos>,
}

impl LineMap {
    /// Build a line map from source text. `\r\n`, `\r` and `\n` all end a line.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0u32];
        let mut chars = text.chars().enumerate().peekable();
        while let Some((i, ch)) = chars.next() {
            let ends_line = match ch {
                '\n' | '\u{2028}' | '\u{2029}' => true,
                '\r' => !matches!(chars.peek(), Some((_, '\n'))),
                _ => false,
            };
            if ends_line {
                line_starts.push((i + 1) as TextPos);
            }
        }
        Self { line_starts }
    }

    /// Get the 0-based line number for a character offset.
    pub fn line_of(&self, pos: TextPos) -> usize {
        match self.line_starts.binary_search(&pos) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        }
    }

    /// Get the 1-based line and 0-based column for a character offset.
    pub fn line_and_column_of(&self, pos: TextPos) -> LineAndColumn {
        let line = self.line_of(pos);
        LineAndColumn {
            line: line as u32 + 1,
            column: pos - self.line_starts[line],
        }
    }

    /// Get the character offset of the start of a 1-based line.
    pub fn line_start(&self, line: u32) -> Option<TextPos> {
        let idx = (line as usize).checked_sub(1)?;
        self.line_starts.get(idx).copied()
    }

    /// Get the total number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// Count the line breaks embedded in `text`. `\r\n` counts once.
pub fn count_line_breaks(text: &str) -> u32 {
    let bytes = text.as_bytes();
    let mut count = 0;
    for i in memchr::memchr2_iter(b'\r', b'\n', bytes) {
        if bytes[i] == b'\n' && i > 0 && bytes[i - 1] == b'\r' {
            continue;
        }
        count += 1;
    }
    count + text.matches(['\u{2028}', '\u{2029}']).count() as u32
}
