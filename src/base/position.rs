/// Line/column positions for tokens and declarations
///
/// Both coordinates are 0-indexed, matching the LSP convention. Columns count
/// UTF-8 bytes from the start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// A half-open range between two [`LineCol`] positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LineColRange {
    pub start: LineCol,
    pub end: LineCol,
}

impl LineCol {
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl LineColRange {
    pub fn new(start: LineCol, end: LineCol) -> Self {
        Self { start, end }
    }

    /// Create a range from line/column coordinates
    pub fn from_coords(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start: LineCol::new(start_line, start_col),
            end: LineCol::new(end_line, end_col),
        }
    }

    /// Check if a position falls within this range (end exclusive)
    pub fn contains(&self, position: LineCol) -> bool {
        self.start <= position && position < self.end
    }
}

impl std::fmt::Display for LineCol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Human-facing output is 1-based.
        write!(f, "{}:{}", u64::from(self.line) + 1, u64::from(self.col) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_contains_is_half_open() {
        let range = LineColRange::from_coords(2, 4, 2, 7);
        assert!(!range.contains(LineCol::new(2, 3)));
        assert!(range.contains(LineCol::new(2, 4)));
        assert!(range.contains(LineCol::new(2, 6)));
        assert!(!range.contains(LineCol::new(2, 7)));
    }

    #[test]
    fn test_multiline_range_contains() {
        let range = LineColRange::from_coords(1, 10, 3, 2);
        assert!(range.contains(LineCol::new(2, 0)));
        assert!(range.contains(LineCol::new(2, 100)));
        assert!(!range.contains(LineCol::new(3, 2)));
        assert!(!range.contains(LineCol::new(0, 12)));
    }

    #[test]
    fn test_display_is_one_based() {
        assert_eq!(LineCol::new(0, 0).to_string(), "1:1");
        assert_eq!(LineCol::new(4, 9).to_string(), "5:10");
        assert_eq!(LineCol::new(0, u32::MAX).to_string(), "1:4294967296");
    }
}
