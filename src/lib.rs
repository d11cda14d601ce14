//! Scope-bounded name and path resolution over a tree of named, typed models.
//!
//! A [`ModelTree`](tree::ModelTree) holds models in an arena. Each model has
//! a name, a kind from a declared [`KindTable`](tree::KindTable), and an
//! ordered record of attributes. On top of the tree sit:
//!
//! - [`query`] - scope visibility and the structural queries built on it
//! - [`modelpath`] - the path language used by `get` and `set`
//! - [`link`] - wiring of models to collaborators with missing-link policies
//! - [`file`] - loading tree descriptions from YAML
//! - [`config`] - settings for the `modeltree` binary

pub mod attribute;
pub mod config;
pub mod file;
pub mod link;
pub mod modelpath;
pub mod query;
pub mod tree;
