use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::base::{LineColRange, TextRange};
use crate::syntax::TextStructure;

/// How a file entered the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileOrigin {
    /// Opened directly (file list, editor, API); built as its own unit.
    TranslationUnit,
    /// Reached only through `` `include ``; built inside its includer.
    Include,
}

/// Parse state of a registered file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileStatus {
    Unparsed,
    Parsed,
    /// Parsed with recoverable syntax errors; the tree is still usable.
    ParsedWithErrors,
    /// Reading the file failed.
    Unreadable,
}

/// A file registered with a [`VerilogProject`](super::VerilogProject).
#[derive(Debug, Clone)]
pub struct SourceFile {
    relative_path: PathBuf,
    resolved_path: PathBuf,
    origin: FileOrigin,
    content: Option<Arc<str>>,
    text: Option<TextStructure>,
    status: FileStatus,
}

impl SourceFile {
    pub(super) fn new(relative_path: PathBuf, resolved_path: PathBuf, origin: FileOrigin) -> Self {
        Self {
            relative_path,
            resolved_path,
            origin,
            content: None,
            text: None,
            status: FileStatus::Unparsed,
        }
    }

    /// Path as registered, relative to the project root when possible.
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Path on the filesystem.
    pub fn resolved_path(&self) -> &Path {
        &self.resolved_path
    }

    pub fn origin(&self) -> FileOrigin {
        self.origin
    }

    pub(super) fn promote_to_translation_unit(&mut self) {
        self.origin = FileOrigin::TranslationUnit;
    }

    pub fn status(&self) -> FileStatus {
        self.status
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Replace the content; the next parse starts from scratch.
    pub fn set_content(&mut self, content: impl Into<Arc<str>>) {
        self.content = Some(content.into());
        self.text = None;
        self.status = FileStatus::Unparsed;
    }

    pub(super) fn mark_unreadable(&mut self) {
        self.text = None;
        self.status = FileStatus::Unreadable;
    }

    /// Parse the loaded content if not done yet.
    pub(super) fn parse_content(&mut self) -> Option<&TextStructure> {
        if self.text.is_none() {
            let content = self.content.clone()?;
            let text = TextStructure::new(content);
            self.status = if text.has_errors() {
                FileStatus::ParsedWithErrors
            } else {
                FileStatus::Parsed
            };
            self.text = Some(text);
        }
        self.text.as_ref()
    }

    /// The parsed text, once [`ensure_parsed`](super::VerilogProject::ensure_parsed) ran.
    pub fn text_structure(&self) -> Option<&TextStructure> {
        self.text.as_ref()
    }

    /// Line/column span of a byte range, if the file is parsed.
    pub fn range_for(&self, anchor: TextRange) -> Option<LineColRange> {
        self.text.as_ref().map(|text| text.range_for(anchor))
    }
}
