//! Diagnostics: Build and Resolve status reporting.
//!
//! Per-symbol problems never abort a pass; they are collected as
//! [`Diagnostic`] values in the order they were found.

use std::fmt;
use std::sync::Arc;

use crate::base::{FileId, TextRange};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
            Severity::Hint => 4,
        }
    }
}

/// A diagnostic message with optional location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The file this diagnostic is about, if any.
    pub file: Option<FileId>,
    /// Byte range within `file`.
    pub range: Option<TextRange>,
    /// Severity level.
    pub severity: Severity,
    /// Error/warning code (e.g., "E0001").
    pub code: Option<Arc<str>>,
    /// The diagnostic message.
    pub message: Arc<str>,
}

impl Diagnostic {
    fn new(severity: Severity, message: impl Into<Arc<str>>) -> Self {
        Self {
            file: None,
            range: None,
            severity,
            code: None,
            message: message.into(),
        }
    }

    /// Create a new error diagnostic.
    pub fn error(message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Attach the file the diagnostic is about.
    pub fn in_file(mut self, file: FileId) -> Self {
        self.file = Some(file);
        self
    }

    /// Set the span (range) for this diagnostic.
    pub fn with_range(mut self, range: TextRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "[{}] {}", code, self.message),
            None => f.write_str(&self.message),
        }
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Standard diagnostic codes.
///
/// ## Error Code Ranges
///
/// - **E0001-E0009**: Symbol errors (resolution, duplicates)
/// - **E0010-E0019**: File-level errors (reading, parsing, includes)
pub mod codes {
    /// Reference that names no visible declaration.
    pub const UNRESOLVED_REFERENCE: &str = "E0001";

    /// Name declared twice in the same scope.
    pub const DUPLICATE_DEFINITION: &str = "E0004";

    /// A registered file could not be read.
    pub const UNREADABLE_FILE: &str = "E0010";

    /// Recoverable syntax error; the tolerant tree is still built.
    pub const SYNTAX_ERROR: &str = "E0011";

    /// `` `include `` target not found on any search path.
    pub const MISSING_INCLUDE: &str = "E0012";

    /// `` `include `` cycle or nesting beyond the configured depth.
    pub const RECURSIVE_INCLUDE: &str = "E0013";
}
