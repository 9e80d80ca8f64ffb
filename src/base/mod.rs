//! Foundation types for the Verilog language-server core.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`FileId`] - Index of a source file inside one project snapshot
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`], [`LineColRange`] - Zero-based line/column positions
//! - [`LineIndex`] - Offset to line/column conversion
//!
//! This module has NO dependencies on other crate modules.

mod file_id;
mod line_index;
mod position;

pub use file_id::FileId;
pub use line_index::LineIndex;
pub use position::{LineCol, LineColRange};

// Re-export text-size types for convenience
pub use text_size;
pub use text_size::{TextRange, TextSize};
