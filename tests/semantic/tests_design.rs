//! A small multi-file design resolved end to end.

use vls::semantic::{NodeId, SymbolKind, SymbolTable, codes};

use crate::helpers::fixtures::analyze;

const PKG: &str = "package bus_pkg;\n  typedef logic [7:0] word_t;\nendpackage\n";
const FIFO: &str = "module fifo(input logic clk, output logic full);\n  import bus_pkg::*;\n  word_t mem;\nendmodule\n";
const TOP: &str = "module top;\n  import bus_pkg::*;\n  wire clk, full;\n  word_t data;\n  fifo u_fifo(.clk(clk), .full(full));\n  assign data = u_fifo.mem;\nendmodule\n";

fn node(table: &SymbolTable, path: &[&str]) -> NodeId {
    path.iter()
        .try_fold(table.root(), |scope, key| table.child(scope, key))
        .unwrap_or_else(|| panic!("no node {path:?}"))
}

#[test]
fn test_design_resolves_without_diagnostics() {
    let (table, _, diagnostics) = analyze(&[("pkg.sv", PKG), ("fifo.sv", FIFO), ("top.sv", TOP)]);

    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    let unresolved: Vec<String> = table
        .references()
        .filter(|(_, reference)| !reference.is_resolved())
        .map(|(_, reference)| reference.path())
        .collect();
    assert!(unresolved.is_empty(), "{unresolved:?}");
}

#[test]
fn test_design_links() {
    let (table, _, _) = analyze(&[("pkg.sv", PKG), ("fifo.sv", FIFO), ("top.sv", TOP)]);

    let word_t = node(&table, &["bus_pkg", "word_t"]);
    assert_eq!(table.info(word_t).unwrap().kind, SymbolKind::TypeAlias);
    assert_eq!(table.declared_type_target(node(&table, &["top", "data"])), Some(word_t));
    assert_eq!(table.declared_type_target(node(&table, &["fifo", "mem"])), Some(word_t));

    let u_fifo = node(&table, &["top", "u_fifo"]);
    assert_eq!(table.declared_type_target(u_fifo), Some(node(&table, &["fifo"])));

    let hierarchical = table
        .references()
        .map(|(_, reference)| reference)
        .find(|reference| reference.path() == "u_fifo.mem")
        .unwrap();
    assert_eq!(hierarchical.target(), Some(node(&table, &["fifo", "mem"])));

    let port = node(&table, &["fifo", "full"]);
    assert!(table.info(port).unwrap().is_port);
    assert!(table.references().any(|(_, r)| r.path() == "full" && r.target() == Some(port)));
}

#[test]
fn test_file_order_does_not_matter() {
    let (_, _, forward) = analyze(&[("pkg.sv", PKG), ("fifo.sv", FIFO), ("top.sv", TOP)]);
    let (_, _, backward) = analyze(&[("top.sv", TOP), ("fifo.sv", FIFO), ("pkg.sv", PKG)]);

    assert!(forward.is_empty());
    assert!(backward.is_empty());
}

#[test]
fn test_removing_a_file_reports_what_it_declared() {
    let (_, _, diagnostics) = analyze(&[("fifo.sv", FIFO), ("top.sv", TOP)]);
    let unresolved: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.has_code(codes::UNRESOLVED_REFERENCE))
        .collect();

    // both wildcard imports of bus_pkg fail, and with them every word_t use
    assert!(unresolved.iter().any(|d| d.message.contains("`bus_pkg`")));
    assert!(unresolved.iter().any(|d| d.message.contains("`word_t`")));
}
