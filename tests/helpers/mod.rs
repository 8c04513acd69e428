//! Shared helpers for the integration tests

pub mod diagnostic_helpers;
pub mod source_fixtures;
pub mod tree_render;
