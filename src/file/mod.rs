//! File I/O for tree descriptions.
//!
//! This module loads YAML tree descriptions from disk (plain or gzipped),
//! from stdin, or from memory, and builds them into a [`ModelTree`](crate::tree::ModelTree).

pub mod loader;
