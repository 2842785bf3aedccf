//! Shared utilities for pkgtree.
//!
//! This crate provides cross-cutting concerns used by all other pkgtree crates:
//! the unified error type, filesystem primitives that refuse to touch anything
//! outside the recipe tree (and honour dry-run), and terminal status lines.

pub mod errors;
pub mod fs;
pub mod progress;
