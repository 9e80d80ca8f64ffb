//! Structural properties every built table must have.

use rstest::rstest;
use rustc_hash::FxHashSet;
use vls::semantic::{NodeId, SymbolTable, codes};

use crate::helpers::fixtures::{analyze, shape};

const DESIGN: &[(&str, &str)] = &[
    ("pkg.sv", "package p;\n  typedef enum { RED, GREEN } color_t;\n  parameter N = 2;\nendpackage\n"),
    (
        "top.sv",
        "module top(input logic clk);\n  import p::*;\n  color_t c;\n  generate\n    for (genvar i = 0; i < N; i++) begin : lanes\n      wire w;\n    end\n  endgenerate\n  always_ff @(posedge clk) begin\n    c <= RED;\n  end\n  initial begin\n  end\nendmodule\n",
    ),
];

const DUPLICATES: &[(&str, &str)] = &[
    ("a.sv", "module top;\n  wire x;\n  wire x;\n  logic x;\nendmodule\n"),
    ("b.sv", "module top;\n  wire y;\nendmodule\n"),
];

fn parents_reach_root(table: &SymbolTable, id: NodeId) -> bool {
    let mut current = id;
    for _ in 0..table.len() {
        match table.parent(current) {
            Some(parent) => current = parent,
            None => return current == table.root(),
        }
    }
    false
}

#[rstest]
#[case::design(DESIGN)]
#[case::duplicates(DUPLICATES)]
fn test_sibling_keys_are_unique(#[case] files: &[(&str, &str)]) {
    let (table, _, _) = analyze(files);
    for id in table.iter_depth_first() {
        let keys: Vec<&str> = table.children(id).map(|(key, _)| key).collect();
        let distinct: FxHashSet<&str> = keys.iter().copied().collect();
        assert_eq!(keys.len(), distinct.len(), "duplicate keys under {}", table.path(id));
    }
}

#[rstest]
#[case::design(DESIGN)]
#[case::duplicates(DUPLICATES)]
fn test_every_node_reaches_keyless_root(#[case] files: &[(&str, &str)]) {
    let (table, _, _) = analyze(files);
    assert_eq!(table.key(table.root()), None);
    assert_eq!(table.parent(table.root()), None);
    assert_eq!(table.iter_depth_first().count(), table.len());
    for id in table.iter_depth_first() {
        assert!(parents_reach_root(&table, id), "{} is detached", table.path(id));
        if id != table.root() {
            assert!(table.key(id).is_some());
        }
    }
}

#[test]
fn test_one_diagnostic_per_extra_declaration() {
    let (table, project, diagnostics) = analyze(DUPLICATES);
    let duplicates: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.has_code(codes::DUPLICATE_DEFINITION))
        .collect();

    // two extra `x` in a.sv, the second `top` in b.sv
    assert_eq!(duplicates.len(), 3);

    // the first declaration keeps its anchor; b.sv's body is never built
    let top = table.child(table.root(), "top").unwrap();
    let x = table.child(top, "x").unwrap();
    let a = project.file(table.info(x).unwrap().file_origin.unwrap()).unwrap();
    assert_eq!(a.range_for(table.info(x).unwrap().anchor.unwrap()).unwrap().start.line, 1);
    assert!(table.child(top, "y").is_none());
}

#[test]
fn test_build_is_deterministic() {
    let (first, _, first_diagnostics) = analyze(DESIGN);
    let (second, _, second_diagnostics) = analyze(DESIGN);

    assert_eq!(shape(&first), shape(&second));
    assert_eq!(first_diagnostics, second_diagnostics);
}
