//! IDE layer tests
//!
//! Tests for:
//! - Definition queries end to end
//! - Handler lifecycle and the dirty flag

mod tests_definition;
mod tests_handler;
