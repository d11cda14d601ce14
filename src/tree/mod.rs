//! Model tree data structures.
//!
//! - [`node`] - `Node`, `NodeId` and `NodeSpec`
//! - [`kinds`] - declared kind hierarchy with precomputed subtype sets
//! - [`arena`] - `ModelTree`, the owning arena and its structural mutations
//! - [`error`] - structural errors

pub mod arena;
pub mod error;
pub mod kinds;
pub mod node;

pub use arena::ModelTree;
pub use error::TreeError;
pub use kinds::{KindDecl, KindTable};
pub use node::{is_valid_name, Node, NodeId, NodeSpec, KIND_ATTRIBUTE, NAME_ATTRIBUTE};
