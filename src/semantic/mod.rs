//! # Semantic Analysis
//!
//! Turns parsed Verilog files into a [`SymbolTable`]: a single tree of
//! declarations for the whole project, with every identifier use linked to
//! the declaration it names.
//!
//! ## Phases
//!
//! 1. **Build** ([`SymbolTable::build`]) walks each translation unit (and
//!    the files it `` `include ``s) and records declarations and unresolved
//!    references.
//! 2. **Resolve** ([`SymbolTable::resolve`]) links references across
//!    scopes, packages and files.
//!
//! Both phases report problems as [`Diagnostic`]s and keep going.
//!
//! ```text
//! VerilogProject ──build──▶ SymbolTable ──resolve──▶ SymbolTable (linked)
//!                   │                      │
//!                   └──── Vec<Diagnostic> ─┘
//! ```

mod build;
pub mod diagnostics;
mod resolve;
pub mod symbol_table;

pub use diagnostics::{Diagnostic, Severity, codes};
pub use symbol_table::{
    DefinitionLookup, DepthFirstLookup, NodeId, Reference, ReferenceComponent, ReferenceKind,
    Separator, SymbolInfo, SymbolKind, SymbolNode, SymbolTable,
};

#[cfg(test)]
mod tests;
