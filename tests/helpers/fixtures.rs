//! Project and handler fixtures over an in-memory filesystem.

use std::sync::Arc;

use vls::ide::{BufferTrackerContainer, HandlerOptions, SymbolTableHandler};
use vls::project::{MemoryFileSystem, VerilogProject};
use vls::semantic::{Diagnostic, NodeId, SymbolTable};

/// Root of every in-memory project.
pub const ROOT: &str = "/work";

/// `file://` URI of a project-relative path.
pub fn uri(relative: &str) -> String {
    format!("file://{ROOT}/{relative}")
}

pub fn memory_fs(files: &[(&str, &str)]) -> MemoryFileSystem {
    let mut fs = MemoryFileSystem::new();
    for (path, text) in files {
        fs.insert(format!("{ROOT}/{path}"), *text);
    }
    fs
}

/// Project with every `.sv` file opened as a translation unit, in order.
pub fn project(files: &[(&str, &str)]) -> VerilogProject {
    let mut project = VerilogProject::new(ROOT, Vec::new(), "", Arc::new(memory_fs(files)));
    for (path, _) in files {
        if path.ends_with(".sv") {
            project.open_translation_unit(path).unwrap();
        }
    }
    project
}

/// Build and resolve `files` into a fresh table.
pub fn analyze(files: &[(&str, &str)]) -> (SymbolTable, VerilogProject, Vec<Diagnostic>) {
    let mut project = project(files);
    let mut table = SymbolTable::new();
    let mut diagnostics = table.build(&mut project);
    diagnostics.extend(table.resolve());
    (table, project, diagnostics)
}

/// Handler configured on `files`, still dirty, with every `.sv` file
/// registered and open in the returned buffers.
pub fn handler(files: &[(&str, &str)]) -> (SymbolTableHandler, BufferTrackerContainer) {
    let fs = Arc::new(memory_fs(files));
    let mut handler = SymbolTableHandler::with_file_system(fs, HandlerOptions::default());
    handler.set_project(ROOT, Vec::new(), "");

    let mut buffers = BufferTrackerContainer::new();
    let project = handler.project_mut().unwrap();
    for (path, text) in files {
        if path.ends_with(".sv") {
            project.open_translation_unit(path).unwrap();
            buffers.update(&uri(path), 1, *text);
        }
    }
    (handler, buffers)
}

/// Keys of every node in depth-first order, with their nesting depth.
pub fn shape(table: &SymbolTable) -> Vec<(usize, String)> {
    table
        .iter_depth_first()
        .map(|id| (depth(table, id), table.key(id).unwrap_or("$root").to_string()))
        .collect()
}

pub fn depth(table: &SymbolTable, id: NodeId) -> usize {
    let mut depth = 0;
    let mut current = table.parent(id);
    while let Some(parent) = current {
        depth += 1;
        current = table.parent(parent);
    }
    depth
}
