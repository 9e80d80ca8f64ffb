//! Parsed text with position lookup.
//!
//! A [`TextStructure`] bundles the source text of one file with its CST and
//! line index, so callers can move freely between byte offsets, line/column
//! positions and syntax tokens.

use std::sync::Arc;

use crate::base::{LineCol, LineColRange, LineIndex, TextRange};
use crate::parser::{AstNode, Parse, SourceFile, SyntaxError, SyntaxNode, SyntaxToken, parse};

/// The parsed view of a single source text.
#[derive(Debug, Clone)]
pub struct TextStructure {
    text: Arc<str>,
    /// The underlying rowan parse result
    parse: Parse,
    line_index: LineIndex,
}

impl TextStructure {
    /// Parse `text`. Parsing never fails; syntax errors are collected.
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        let parse = parse(&text);
        let line_index = LineIndex::new(&text);
        Self {
            text,
            parse,
            line_index,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the underlying parse result
    pub fn parse(&self) -> &Parse {
        &self.parse
    }

    pub fn syntax(&self) -> SyntaxNode {
        self.parse.syntax()
    }

    /// Get the root source file AST node
    pub fn source_file(&self) -> Option<SourceFile> {
        SourceFile::cast(self.parse.syntax())
    }

    /// Check if parsing had errors
    pub fn has_errors(&self) -> bool {
        !self.parse.errors.is_empty()
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.parse.errors
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// The significant token whose span contains `position`.
    ///
    /// Spans are half-open: a position right after the last character of an
    /// identifier is not inside it. Positions on whitespace or comments, or
    /// outside the text, yield `None`.
    pub fn find_token_at(&self, position: LineCol) -> Option<SyntaxToken> {
        let offset = self.line_index.offset(position)?;
        let token = self.syntax().token_at_offset(offset).right_biased()?;
        if token.kind().is_trivia() || !token.text_range().contains(offset) {
            return None;
        }
        Some(token)
    }

    /// Line/column range of a byte range in this text.
    pub fn range_for(&self, range: TextRange) -> LineColRange {
        self.line_index.range(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::SyntaxKind;

    const SOURCE: &str = "module foo;\n  // note\n  wire bar;\nendmodule\n";

    #[test]
    fn test_find_token_at_identifier() {
        let text = TextStructure::new(SOURCE);
        let token = text.find_token_at(LineCol::new(0, 8)).expect("token");
        assert_eq!(token.text(), "foo");
        assert_eq!(token.kind(), SyntaxKind::IDENT);

        let token = text.find_token_at(LineCol::new(2, 7)).expect("token");
        assert_eq!(token.text(), "bar");
    }

    #[test]
    fn test_find_token_at_is_half_open() {
        let text = TextStructure::new(SOURCE);
        // column 7 is the first character of `foo`, column 10 is `;`
        assert_eq!(text.find_token_at(LineCol::new(0, 7)).map(|t| t.to_string()).as_deref(), Some("foo"));
        assert_eq!(text.find_token_at(LineCol::new(0, 10)).map(|t| t.to_string()).as_deref(), Some(";"));
    }

    #[test]
    fn test_find_token_at_trivia_and_out_of_range() {
        let text = TextStructure::new(SOURCE);
        assert!(text.find_token_at(LineCol::new(0, 6)).is_none()); // space
        assert!(text.find_token_at(LineCol::new(1, 4)).is_none()); // comment
        assert!(text.find_token_at(LineCol::new(40, 0)).is_none());
        assert!(text.find_token_at(LineCol::new(0, 400)).is_none());
        assert!(text.find_token_at(LineCol::new(1, u32::MAX)).is_none());
    }

    #[test]
    fn test_range_for_token() {
        let text = TextStructure::new(SOURCE);
        let token = text.find_token_at(LineCol::new(2, 8)).expect("token");
        assert_eq!(text.range_for(token.text_range()), LineColRange::from_coords(2, 7, 2, 10));
    }

    #[test]
    fn test_syntax_errors_are_collected() {
        let text = TextStructure::new("module m; wire ; endmodule");
        assert!(text.has_errors());
        assert!(text.source_file().is_some());
    }
}
