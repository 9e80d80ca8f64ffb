//! # verilog-ls-base
//!
//! Core library for Verilog/SystemVerilog symbol tables, cross-file name
//! resolution and go-to-definition.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide       → Symbol table lifecycle, definition queries, open buffers
//!   ↓
//! semantic  → Symbol table: Build, Resolve, lookup
//!   ↓
//! project   → Project files, include search, verible.filelist
//!   ↓
//! syntax    → TextStructure: parsed text with position lookup
//!   ↓
//! parser    → Logos lexer, recursive-descent parser, typed AST
//!   ↓
//! base      → Primitives (FileId, TextRange, LineCol)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → syntax → project → semantic → ide)
// ============================================================================

/// Foundation types: FileId, TextRange, line/column positions
pub mod base;

/// Parser: Logos lexer, recursive-descent parser, typed AST
pub mod parser;

/// Syntax: parsed source text with position lookup
pub mod syntax;

/// Project management: source files, include paths, file lists
pub mod project;

/// Semantic analysis: symbol table construction and name resolution
pub mod semantic;

/// IDE features: symbol table handler, go-to-definition, buffers
pub mod ide;

// Re-export foundation types
pub use base::{FileId, LineCol, LineColRange, LineIndex, TextRange, TextSize};

pub use ide::{BufferTrackerContainer, DefinitionParams, Location, SymbolTableHandler};
pub use project::VerilogProject;
pub use semantic::{Diagnostic, SymbolTable};
pub use syntax::TextStructure;
