use text_size::{TextRange, TextSize};

use super::position::{LineCol, LineColRange};

/// Maps byte offsets to line/column positions and back.
///
/// Built once per text; lookups are a binary search over line starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Offset of the first byte of every line. Always starts with 0.
    line_starts: Vec<TextSize>,
    /// Total length of the indexed text.
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(TextSize::new(offset as u32 + 1));
            }
        }
        Self {
            line_starts,
            len: TextSize::of(text),
        }
    }

    /// Number of lines (a trailing newline starts a new, empty line).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset to a line/column position.
    ///
    /// Offsets past the end are clamped to the end of the text.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let col = offset - self.line_starts[line];
        LineCol::new(line as u32, u32::from(col))
    }

    /// Convert a line/column position back to a byte offset.
    ///
    /// Returns `None` when the line does not exist or the column lies past
    /// the end of that line.
    pub fn offset(&self, position: LineCol) -> Option<TextSize> {
        let line = position.line as usize;
        let start = *self.line_starts.get(line)?;
        let end = self
            .line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(self.len);
        let offset = TextSize::new(u32::from(start).checked_add(position.col)?);
        (offset <= end).then_some(offset)
    }

    /// Convert a byte range to a line/column range.
    pub fn range(&self, range: TextRange) -> LineColRange {
        LineColRange::new(self.line_col(range.start()), self.line_col(range.end()))
    }
}
