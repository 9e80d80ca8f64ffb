//! Symbol table tests over whole projects
//!
//! Tests for:
//! - Tree properties after Build (unique keys, parent chains)
//! - Resolution across a multi-file design

mod tests_design;
mod tests_tree_properties;
