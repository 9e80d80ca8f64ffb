//! Shared test fixtures
//!
//! - `fixtures`: in-memory projects, handlers and open buffers rooted at `/work`

#![allow(dead_code)]

pub mod fixtures;
