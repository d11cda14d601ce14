//! Error types for model path parsing and evaluation.

use thiserror::Error;

use crate::attribute::AccessError;
use crate::tree::TreeError;

/// Errors that can occur while parsing or evaluating a model path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    /// Unexpected character at a specific position.
    #[error("Unexpected token '{found}' at position {position}, expected {expected}")]
    UnexpectedToken {
        position: usize,
        found: String,
        expected: String,
    },
    /// Unexpected end of input.
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: String },
    /// Invalid syntax with description.
    #[error("Invalid model path syntax: {message}")]
    InvalidSyntax { message: String },
    /// A structural segment, scope search or attribute did not match.
    #[error("'{segment}' not found while resolving '{path}'")]
    NotFound { path: String, segment: String },
    /// `set` was given a path that resolves to a node, not an attribute.
    #[error("'{path}' names a model, not an attribute")]
    NodeTarget { path: String },
    /// The attribute rejected the write.
    #[error("cannot set '{path}': {source}")]
    Access {
        path: String,
        #[source]
        source: AccessError,
    },
    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl PathError {
    /// Returns true for failures that only mean "nothing matched".
    pub fn is_not_found(&self) -> bool {
        matches!(self, PathError::NotFound { .. })
    }
}
