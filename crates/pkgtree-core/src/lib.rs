//! Core data types for pkgtree.
//!
//! This crate defines the vocabulary shared by the resolver and the tree
//! operations: package names and atoms, recipe versions, reduced dependency
//! expressions, recipe metadata, profiles, configuration, the
//! [`database::PackageDatabase`] capability and its on-disk implementation.
//!
//! This crate performs no filesystem mutation.

pub mod atom;
pub mod config;
pub mod database;
pub mod depspec;
pub mod metadata;
pub mod profile;
pub mod tree;
pub mod version;
