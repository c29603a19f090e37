//! Integration test suite for docgen
//!
//! End-to-end tests for the template pipeline and the `docgen` binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **rendering**: compile and render through the public library API
//! - **template_cache**: shared compiled trees, replacement and concurrency
//! - **cli_render**: `render`, `batch` and `config` commands
//! - **cli_inspect**: `check`, `normalize` and `variables` commands

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod cli_inspect;
mod cli_render;
mod rendering;
mod template_cache;
