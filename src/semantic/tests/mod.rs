#![allow(clippy::unwrap_used)]


use std::sync::Arc;

use crate::base::FileId;
use crate::project::{MemoryFileSystem, VerilogProject};
use crate::semantic::{Diagnostic, NodeId, SymbolTable};

/// Project rooted at `/work`; `.sv` files are opened as translation units
/// in the given order, everything else is only reachable by `include.
fn project(files: &[(&str, &str)]) -> VerilogProject {
    let mut fs = MemoryFileSystem::new();
    for (path, text) in files {
        fs.insert(format!("/work/{path}"), *text);
    }
    let mut project = VerilogProject::new("/work", Vec::new(), "", Arc::new(fs));
    for (path, _) in files {
        if path.ends_with(".sv") {
            project.open_translation_unit(path).unwrap();
        }
    }
    project
}

fn build(files: &[(&str, &str)]) -> (SymbolTable, VerilogProject, Vec<Diagnostic>) {
    let mut project = project(files);
    let mut table = SymbolTable::new();
    let diagnostics = table.build(&mut project);
    (table, project, diagnostics)
}

fn build_and_resolve(files: &[(&str, &str)]) -> (SymbolTable, VerilogProject, Vec<Diagnostic>) {
    let (mut table, project, mut diagnostics) = build(files);
    diagnostics.extend(table.resolve());
    (table, project, diagnostics)
}

/// Node at a `::`-free path of keys below the root.
fn node(table: &SymbolTable, path: &[&str]) -> NodeId {
    path.iter().fold(NodeId::ROOT, |id, key| {
        table
            .child(id, key)
            .unwrap_or_else(|| panic!("no `{}` under {}", key, table.path(id)))
    })
}

fn file_id(project: &VerilogProject, relative: &str) -> FileId {
    project
        .lookup_registered_file(std::path::Path::new(relative))
        .unwrap()
}

fn with_code<'a>(diagnostics: &'a [Diagnostic], code: &str) -> Vec<&'a Diagnostic> {
    diagnostics.iter().filter(|d| d.has_code(code)).collect()
}
