//! Project configuration tests
//!
//! Tests for:
//! - `verible.filelist` discovery and loading through the handler

mod tests_file_list;
