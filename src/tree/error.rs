//! Errors raised by structural tree operations.

use thiserror::Error;

use super::node::NodeId;

/// Structural errors. Every operation that can fail checks all of its
/// preconditions before touching the tree, so an error means nothing changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The id does not refer to a live node (never existed or was removed).
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
    /// The name cannot be addressed by a model path.
    #[error("'{0}' is not a valid model name")]
    InvalidName(String),
    #[error("cannot remove the root node")]
    RootRemoval,
    #[error("cannot detach or re-attach the root node")]
    RootAttach,
    /// The node already has a parent; it must be detached first.
    #[error("node {0} is already attached")]
    AlreadyAttached(NodeId),
    /// The target parent lies inside the subtree being attached.
    #[error("attaching {node} under {parent} would create a cycle")]
    CycleDetected { node: NodeId, parent: NodeId },
    /// The parent's kind is not one the child's kind may live under.
    #[error("a '{child_kind}' cannot be placed under a '{parent_kind}'")]
    InvalidParent {
        child_kind: String,
        parent_kind: String,
    },
    #[error("index {index} out of bounds for {len} children")]
    IndexOutOfBounds { index: usize, len: usize },
    /// A kind declaration names a base kind that was never declared.
    #[error("unknown kind '{0}'")]
    UnknownKind(String),
    #[error("kind '{0}' is already declared")]
    DuplicateKind(String),
}
