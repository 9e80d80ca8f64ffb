//! File list discovery and loading, in memory and on disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rstest::rstest;
use vls::ide::{
    BufferTrackerContainer, DefinitionParams, HandlerOptions, HandlerState, Location, Position,
    Range, SymbolTableHandler, path_to_lsp_uri,
};
use vls::project::{FILE_LIST_NAME, MemoryFileSystem, find_file_upwards};

use crate::helpers::fixtures::memory_fs;

fn memory_handler(fs: MemoryFileSystem) -> SymbolTableHandler {
    let mut handler = SymbolTableHandler::with_file_system(Arc::new(fs), HandlerOptions::default());
    handler.set_project("/work", Vec::new(), "");
    handler
}

// =============================================================================
// DISCOVERY
// =============================================================================

#[rstest]
#[case::in_start_dir("/work")]
#[case::one_up("/work/rtl")]
#[case::far_up("/work/rtl/core/alu")]
fn test_find_file_upwards(#[case] start: &str) {
    let fs = memory_fs(&[(FILE_LIST_NAME, "")]);
    assert_eq!(
        find_file_upwards(&fs, Path::new(start), FILE_LIST_NAME),
        Some(PathBuf::from("/work/verible.filelist"))
    );
}

#[test]
fn test_find_file_upwards_prefers_nearest() {
    let fs = memory_fs(&[(FILE_LIST_NAME, ""), ("rtl/verible.filelist", "")]);
    assert_eq!(
        find_file_upwards(&fs, Path::new("/work/rtl/core"), FILE_LIST_NAME),
        Some(PathBuf::from("/work/rtl/verible.filelist"))
    );
}

#[test]
fn test_no_file_list_up_to_root_changes_nothing() {
    let mut handler = memory_handler(memory_fs(&[("rtl/top.sv", "module top;\nendmodule\n")]));
    handler.build_project_symbol_table();

    handler.load_project_file_list("/work/rtl/deep");

    let project = handler.project().unwrap();
    assert!(project.include_paths().is_empty());
    assert!(project.is_empty());
    assert_eq!(handler.state(), HandlerState::Clean);
}

// =============================================================================
// LOADING
// =============================================================================

#[test]
fn test_reloading_same_list_keeps_table_clean() {
    let mut handler = memory_handler(memory_fs(&[
        (FILE_LIST_NAME, "+incdir+include\nrtl/top.sv\n"),
        ("rtl/top.sv", "module top;\nendmodule\n"),
    ]));

    handler.load_project_file_list("/work/rtl");
    assert_eq!(handler.state(), HandlerState::Dirty);
    handler.build_project_symbol_table();

    handler.load_project_file_list("/work/rtl");
    assert_eq!(handler.state(), HandlerState::Clean);
    assert_eq!(handler.project().unwrap().len(), 1);
    assert_eq!(handler.full_build_count(), 1);
}

struct DiskProject {
    _dir: tempfile::TempDir,
    root: PathBuf,
}

fn disk_project(files: &[(&str, &str)]) -> DiskProject {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    for (path, text) in files {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }
    DiskProject { _dir: dir, root }
}

#[test]
fn test_file_list_on_disk_end_to_end() {
    let top = "module top;\n`include \"defs.svh\"\n  assign from_include = 1'b0;\nendmodule\n";
    let disk = disk_project(&[
        (FILE_LIST_NAME, "# rtl sources\n+incdir+include\nrtl/top.sv\nrtl/gone.sv\n"),
        ("rtl/top.sv", top),
        ("include/defs.svh", "wire from_include;\n"),
    ]);
    let mut handler = SymbolTableHandler::new();
    handler.set_project(&disk.root, Vec::new(), "");

    handler.load_project_file_list(disk.root.join("rtl"));

    let project = handler.project().unwrap();
    assert_eq!(project.include_paths(), [disk.root.join("include")]);
    // gone.sv is skipped, defs.svh registered by the incremental build
    assert_eq!(project.translation_units().len(), 1);
    assert_eq!(project.len(), 2);
    assert_eq!(handler.state(), HandlerState::Dirty);

    let top_uri = path_to_lsp_uri(disk.root.join("rtl/top.sv"));
    let mut buffers = BufferTrackerContainer::new();
    buffers.update(&top_uri, 1, top);

    let locations = handler.find_definition(&DefinitionParams::new(top_uri, 2, 9), &buffers);

    assert_eq!(
        locations,
        vec![Location {
            uri: path_to_lsp_uri(disk.root.join("include/defs.svh")),
            range: Range {
                start: Position::new(0, 5),
                end: Position::new(0, 17),
            },
        }]
    );
    assert_eq!(handler.full_build_count(), 1);
}

#[test]
fn test_malformed_file_list_on_disk_adds_nothing() {
    let disk = disk_project(&[
        (FILE_LIST_NAME, "+incdir+include\nrtl/top.sv\n-y lib\n"),
        ("rtl/top.sv", "module top;\nendmodule\n"),
    ]);
    let mut handler = SymbolTableHandler::new();
    handler.set_project(&disk.root, Vec::new(), "");
    handler.build_project_symbol_table();

    handler.load_project_file_list(&disk.root);

    let project = handler.project().unwrap();
    assert!(project.include_paths().is_empty());
    assert!(project.is_empty());
    assert!(handler.symbol_table().is_empty());
    assert_eq!(handler.state(), HandlerState::Clean);
}
