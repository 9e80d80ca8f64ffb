//! Handler lifecycle: dirty flag, resets and rebuilds.

use rstest::rstest;
use vls::ide::{DefinitionParams, HandlerState};

use crate::helpers::fixtures::{handler, shape, uri};

const TOP: &str = "module top;\n  sub u0();\n  logic q;\nendmodule\n";
const SUB: &str = "module sub;\n  wire s;\nendmodule\n";

#[test]
fn test_first_query_builds_once() {
    let (mut handler, buffers) = handler(&[("top.sv", TOP), ("sub.sv", SUB)]);
    assert_eq!(handler.state(), HandlerState::Dirty);
    assert_eq!(handler.full_build_count(), 0);

    let params = DefinitionParams::new(uri("top.sv"), 1, 3);
    assert_eq!(handler.find_definition(&params, &buffers).len(), 1);
    assert_eq!(handler.full_build_count(), 1);
    assert_eq!(handler.state(), HandlerState::Clean);

    assert_eq!(handler.find_definition(&params, &buffers).len(), 1);
    assert_eq!(handler.full_build_count(), 1);
}

#[test]
fn test_failed_query_still_leaves_table_clean() {
    let (mut handler, buffers) = handler(&[("top.sv", TOP)]);

    let params = DefinitionParams::new("untitled://scratch", 0, 0);
    assert!(handler.find_definition(&params, &buffers).is_empty());

    assert_eq!(handler.full_build_count(), 1);
    assert_eq!(handler.state(), HandlerState::Clean);
}

#[test]
fn test_set_project_discards_previous_table() {
    let (mut handler, buffers) = handler(&[("top.sv", TOP), ("sub.sv", SUB)]);
    let params = DefinitionParams::new(uri("top.sv"), 1, 3);
    assert_eq!(handler.find_definition(&params, &buffers).len(), 1);

    handler.set_project("/work", Vec::new(), "");

    assert_eq!(handler.state(), HandlerState::Dirty);
    assert_eq!(handler.symbol_table().len(), 1);
    assert!(handler.project().unwrap().is_empty());

    // nothing registered any more: the rebuilt table is empty
    assert!(handler.find_definition(&params, &buffers).is_empty());
    assert_eq!(handler.full_build_count(), 2);
}

#[rstest]
#[case::once(1)]
#[case::twice(2)]
fn test_reset_yields_empty_tree(#[case] resets: usize) {
    let (mut handler, _) = handler(&[("top.sv", TOP), ("sub.sv", SUB)]);
    handler.build_project_symbol_table();
    assert!(handler.symbol_table().len() > 1);

    for _ in 0..resets {
        handler.reset_symbol_table();
        assert_eq!(handler.symbol_table().len(), 1);
        assert!(handler.symbol_table().is_empty());
    }
}

#[test]
fn test_rebuild_reproduces_same_tree() {
    let (mut handler, _) = handler(&[("top.sv", TOP), ("sub.sv", SUB)]);
    handler.build_project_symbol_table();
    let first = shape(handler.symbol_table());

    handler.reset_symbol_table();
    handler.reset_symbol_table();
    handler.build_project_symbol_table();

    assert_eq!(shape(handler.symbol_table()), first);
    assert_eq!(
        first,
        vec![
            (0, "$root".to_string()),
            (1, "sub".to_string()),
            (2, "s".to_string()),
            (1, "top".to_string()),
            (2, "q".to_string()),
            (2, "u0".to_string()),
        ]
    );
}

#[test]
fn test_incremental_build_then_full_build() {
    let (mut handler, _) = handler(&[("top.sv", TOP), ("sub.sv", SUB)]);
    let units = handler.project().unwrap().translation_units();

    handler.build_symbol_table_for(units[1]);
    assert!(handler.symbol_table().child(handler.symbol_table().root(), "sub").is_some());
    assert!(handler.symbol_table().child(handler.symbol_table().root(), "top").is_none());
    assert_eq!(handler.state(), HandlerState::Dirty);

    handler.build_project_symbol_table();
    assert!(handler.symbol_table().child(handler.symbol_table().root(), "top").is_some());
}
