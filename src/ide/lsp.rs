//! Editor-protocol value types.
//!
//! Only the shapes the definition request needs. Field names follow the
//! protocol (camelCase on the wire when the `serde` feature is enabled).

use crate::base::{LineCol, LineColRange};

/// Zero-based line and character offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl From<LineCol> for Position {
    fn from(position: LineCol) -> Self {
        Self::new(position.line, position.col)
    }
}

impl From<Position> for LineCol {
    fn from(position: Position) -> Self {
        LineCol::new(position.line, position.character)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl From<LineColRange> for Range {
    fn from(range: LineColRange) -> Self {
        Self {
            start: range.start.into(),
            end: range.end.into(),
        }
    }
}

/// A range inside the document at `uri`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Location {
    pub uri: String,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TextDocumentIdentifier {
    pub uri: String,
}

/// `textDocument/definition` request parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DefinitionParams {
    pub text_document: TextDocumentIdentifier,
    pub position: Position,
}

impl DefinitionParams {
    pub fn new(uri: impl Into<String>, line: u32, character: u32) -> Self {
        Self {
            text_document: TextDocumentIdentifier { uri: uri.into() },
            position: Position::new(line, character),
        }
    }
}
