//! Go-to-definition through the handler.

use std::cell::Cell;
use std::rc::Rc;

use vls::ide::{
    BufferTrackerContainer, DefinitionParams, Location, Position, QueryError, Range,
    find_definition,
};
use vls::semantic::{DefinitionLookup, DepthFirstLookup, NodeId, SymbolTable};

use crate::helpers::fixtures::{analyze, handler, uri};

fn location(relative: &str, line: u32, start: u32, end: u32) -> Location {
    Location {
        uri: uri(relative),
        range: Range {
            start: Position::new(line, start),
            end: Position::new(line, end),
        },
    }
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[test]
fn test_instance_type_in_same_file() {
    let source = "module foo;\nendmodule\n\nmodule top;\n  foo u_foo();\nendmodule\n";
    let (mut handler, buffers) = handler(&[("a.sv", source)]);

    let params = DefinitionParams::new(uri("a.sv"), 4, 3);
    let locations = handler.find_definition(&params, &buffers);

    assert_eq!(locations, vec![location("a.sv", 0, 7, 10)]);
}

#[test]
fn test_undeclared_symbol_is_empty() {
    let source = "module top;\n  assign y = 1'b0;\nendmodule\n";
    let (mut handler, buffers) = handler(&[("top.sv", source)]);

    let params = DefinitionParams::new(uri("top.sv"), 1, 9);

    assert_eq!(
        handler.definition_location(&params, &buffers),
        Err(QueryError::SymbolNotFound("y".to_string()))
    );
    assert!(handler.find_definition(&params, &buffers).is_empty());
}

#[derive(Debug, Default)]
struct CountingLookup {
    calls: Rc<Cell<usize>>,
}

impl DefinitionLookup for CountingLookup {
    fn lookup(&self, table: &SymbolTable, name: &str) -> Option<NodeId> {
        self.calls.set(self.calls.get() + 1);
        DepthFirstLookup.lookup(table, name)
    }
}

#[test]
fn test_untitled_uri_skips_lookup() {
    let source = "module top;\nendmodule\n";
    let (handler, mut buffers) = handler(&[("top.sv", source)]);
    let calls = Rc::new(Cell::new(0));
    let mut handler = handler.with_definition_lookup(Box::new(CountingLookup {
        calls: Rc::clone(&calls),
    }));
    buffers.update("untitled://Untitled-1", 1, source);

    let params = DefinitionParams::new("untitled://Untitled-1", 0, 8);

    assert!(handler.find_definition(&params, &buffers).is_empty());
    assert_eq!(
        handler.definition_location(&params, &buffers),
        Err(QueryError::UnsupportedUri("untitled://Untitled-1".to_string()))
    );
    assert_eq!(calls.get(), 0);

    // same lookup answers a file:// query
    let params = DefinitionParams::new(uri("top.sv"), 0, 8);
    assert_eq!(handler.find_definition(&params, &buffers).len(), 1);
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_instance_type_in_other_file() {
    let (mut handler, buffers) = handler(&[
        ("a.sv", "module bar;\nendmodule\n"),
        ("b.sv", "module top;\n  bar u_bar();\nendmodule\n"),
    ]);

    let params = DefinitionParams::new(uri("b.sv"), 1, 2);
    let locations = handler.find_definition(&params, &buffers);

    assert_eq!(locations, vec![location("a.sv", 0, 7, 10)]);
}

#[test]
fn test_find_definition_on_prebuilt_table() {
    let files = [
        ("a.sv", "module bar;\nendmodule\n"),
        ("b.sv", "module top;\n  bar u_bar();\nendmodule\n"),
    ];
    let (table, project, _) = analyze(&files);
    let mut buffers = BufferTrackerContainer::new();
    buffers.update(&uri("b.sv"), 1, files[1].1);

    let params = DefinitionParams::new(uri("b.sv"), 1, 2);
    let locations = find_definition(&project, &table, &DepthFirstLookup, &params, &buffers);
    assert_eq!(locations, vec![location("a.sv", 0, 7, 10)]);

    let params = DefinitionParams::new(uri("b.sv"), 1, u32::MAX);
    assert!(find_definition(&project, &table, &DepthFirstLookup, &params, &buffers).is_empty());
}

// =============================================================================
// LOOKUP BEHAVIOUR
// =============================================================================

#[test]
fn test_definition_in_included_file() {
    let (mut handler, buffers) = handler(&[
        (
            "top.sv",
            "module top;\n`include \"defs.svh\"\n  assign from_include = 1'b1;\nendmodule\n",
        ),
        ("defs.svh", "wire from_include;\n"),
    ]);

    let params = DefinitionParams::new(uri("top.sv"), 2, 9);
    let locations = handler.find_definition(&params, &buffers);

    assert_eq!(locations, vec![location("defs.svh", 0, 5, 17)]);
}

#[test]
fn test_definition_ignores_scope_and_takes_first_match() {
    let source = "module a_mod;\n  wire sig;\nendmodule\nmodule b_mod;\n  wire sig;\n  assign sig = 1'b0;\nendmodule\n";
    let (mut handler, buffers) = handler(&[("top.sv", source)]);

    // `sig` inside b_mod still lands on a_mod's declaration
    let params = DefinitionParams::new(uri("top.sv"), 5, 9);
    let locations = handler.find_definition(&params, &buffers);

    assert_eq!(locations, vec![location("top.sv", 1, 7, 10)]);
}

#[test]
fn test_declaration_token_finds_itself() {
    let source = "module top;\n  logic [3:0] count;\nendmodule\n";
    let (mut handler, buffers) = handler(&[("top.sv", source)]);

    let params = DefinitionParams::new(uri("top.sv"), 1, 16);
    let locations = handler.find_definition(&params, &buffers);

    assert_eq!(locations, vec![location("top.sv", 1, 14, 19)]);
}

// =============================================================================
// FAILURES
// =============================================================================

#[test]
fn test_buffer_not_open() {
    let (mut handler, mut buffers) = handler(&[("top.sv", "module top;\nendmodule\n")]);
    buffers.remove(&uri("top.sv"));

    let params = DefinitionParams::new(uri("top.sv"), 0, 8);

    assert_eq!(
        handler.definition_location(&params, &buffers),
        Err(QueryError::BufferNotOpen(uri("top.sv")))
    );
    assert!(handler.find_definition(&params, &buffers).is_empty());
}

#[test]
fn test_no_token_at_position() {
    let (mut handler, buffers) = handler(&[("top.sv", "module top;\nendmodule\n")]);

    let params = DefinitionParams::new(uri("top.sv"), 40, 0);

    assert!(matches!(
        handler.definition_location(&params, &buffers),
        Err(QueryError::NoToken { line: 40, character: 0, .. })
    ));
}

#[test]
fn test_column_at_u32_max_is_no_token() {
    let (mut handler, buffers) = handler(&[("top.sv", "module top;\n  wire w;\nendmodule\n")]);

    let params = DefinitionParams::new(uri("top.sv"), 1, u32::MAX);

    assert!(matches!(
        handler.definition_location(&params, &buffers),
        Err(QueryError::NoToken { line: 1, character: u32::MAX, .. })
    ));
    assert!(handler.find_definition(&params, &buffers).is_empty());

    let params = DefinitionParams::new(uri("top.sv"), u32::MAX, u32::MAX);
    assert!(handler.find_definition(&params, &buffers).is_empty());
}

#[test]
fn test_buffer_for_unregistered_file() {
    let (mut handler, mut buffers) = handler(&[("top.sv", "module top;\nendmodule\n")]);
    buffers.update(&uri("scratch.sv"), 1, "module top;\nendmodule\n");

    let params = DefinitionParams::new(uri("scratch.sv"), 0, 8);

    assert_eq!(
        handler.definition_location(&params, &buffers),
        Err(QueryError::FileNotRegistered(uri("scratch.sv")))
    );
}

#[test]
fn test_query_uses_buffer_text_not_disk_text() {
    let (mut handler, mut buffers) = handler(&[
        ("top.sv", "module top;\nendmodule\n"),
        ("sub.sv", "module sub;\nendmodule\n"),
    ]);
    // unsaved edit: `sub` typed where disk has nothing
    buffers.update(&uri("top.sv"), 2, "module top;\n  sub u0();\nendmodule\n");

    let params = DefinitionParams::new(uri("top.sv"), 1, 3);
    let locations = handler.find_definition(&params, &buffers);

    assert_eq!(locations, vec![location("sub.sv", 0, 7, 10)]);
}
