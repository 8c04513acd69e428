//! Byte offset to line/column conversion

use super::position::{Position, Span};
use text_size::{TextRange, TextSize};

/// Zero-based line and column; the column counts bytes from the line start
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Start offsets of every line in a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    newlines: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let newlines = text
            .match_indices('\n')
            .map(|(i, _)| TextSize::from((i + 1) as u32))
            .collect();
        Self {
            newlines,
            len: TextSize::of(text),
        }
    }

    pub fn line_count(&self) -> usize {
        self.newlines.len() + 1
    }

    /// Offsets past the end clamp to the end of the text
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = self.newlines.partition_point(|&start| start <= offset);
        let line_start = if line == 0 {
            TextSize::from(0)
        } else {
            self.newlines[line - 1]
        };
        LineCol {
            line: line as u32,
            col: u32::from(offset - line_start),
        }
    }

    /// `None` when the line does not exist; columns past the line end clamp to it
    pub fn offset(&self, line_col: LineCol) -> Option<TextSize> {
        let line = line_col.line as usize;
        let start = match line {
            0 => TextSize::from(0),
            _ => *self.newlines.get(line - 1)?,
        };
        let end = self.newlines.get(line).copied().unwrap_or(self.len);
        Some((start + TextSize::from(line_col.col)).min(end))
    }

    pub fn position(&self, offset: TextSize) -> Position {
        let lc = self.line_col(offset);
        Position::new(lc.line as usize, lc.col as usize)
    }

    pub fn span(&self, range: TextRange) -> Span {
        Span::new(self.position(range.start()), self.position(range.end()))
    }
}
