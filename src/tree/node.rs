//! Model node representation.
//!
//! A [`Node`] is a named, typed entry in a [`ModelTree`](super::ModelTree).
//! Nodes never own their parent: the parent link is a [`NodeId`] index into
//! the tree's arena, and ownership flows strictly from the tree down.
//!
//! # Example
//!
//! ```
//! use modeltree::tree::{ModelTree, NodeSpec};
//! use modeltree::attribute::Value;
//!
//! let mut tree = ModelTree::new(NodeSpec::new("Simulations", "Simulations")).unwrap();
//! let clock = tree
//!     .add_child(tree.root(), NodeSpec::new("Clock", "Clock").with_attribute("Year", 1990_i64))
//!     .unwrap();
//!
//! let node = tree.node(clock).unwrap();
//! assert_eq!(node.name(), "Clock");
//! assert_eq!(node.parent(), Some(tree.root()));
//! assert_eq!(node.attributes().get("Year").unwrap().value(), &Value::Int(1990));
//! ```

use std::fmt;

use crate::attribute::{AccessError, AttributeMap, Attributes, Value, ValueKind};

/// Built-in attribute exposing a model's name.
pub const NAME_ATTRIBUTE: &str = "Name";
/// Built-in read-only attribute exposing a model's kind.
pub const KIND_ATTRIBUTE: &str = "Kind";

/// Returns true if `name` can be written as a single path segment: not
/// empty, no surrounding whitespace, and none of `.`, `[` or `]`.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.trim() == name
        && !name.contains(|c| matches!(c, '.' | '[' | ']'))
}

/// Stable identity of a node within one tree.
///
/// Ids are never reused, so an id held after its node was removed can only
/// ever refer to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything needed to create a node, before it is linked into a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub name: String,
    pub kind: String,
    pub attributes: AttributeMap,
}

impl NodeSpec {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            attributes: AttributeMap::new(),
        }
    }

    /// Adds a writable attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    /// Replaces the whole attribute record.
    pub fn with_attributes(mut self, attributes: AttributeMap) -> Self {
        self.attributes = attributes;
        self
    }
}

/// A model linked into a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) kind: String,
    pub(crate) scope_boundary: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) attributes: AttributeMap,
}

impl Node {
    pub(crate) fn from_spec(spec: NodeSpec, scope_boundary: bool) -> Self {
        Self {
            name: spec.name,
            kind: spec.kind,
            scope_boundary,
            parent: None,
            children: Vec::new(),
            attributes: spec.attributes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns true if this node hides its interior from visibility
    /// computations made outside it.
    pub fn is_scope_boundary(&self) -> bool {
        self.scope_boundary
    }

    /// Returns the parent, or `None` for the root and detached nodes.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the children in their significant order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeMap {
        &mut self.attributes
    }
}

impl Attributes for Node {
    fn read(&self, name: &str) -> Option<Value> {
        match name {
            NAME_ATTRIBUTE => Some(Value::Text(self.name.clone())),
            KIND_ATTRIBUTE => Some(Value::Text(self.kind.clone())),
            _ => self.attributes.read(name),
        }
    }

    fn write(&mut self, name: &str, value: Value) -> Result<(), AccessError> {
        match name {
            NAME_ATTRIBUTE => match value {
                Value::Text(new_name) if !is_valid_name(&new_name) => {
                    Err(AccessError::InvalidValue {
                        name: name.to_string(),
                        value: new_name,
                    })
                }
                Value::Text(new_name) => {
                    self.name = new_name;
                    Ok(())
                }
                other => Err(AccessError::TypeMismatch {
                    name: name.to_string(),
                    expected: ValueKind::Text,
                    found: other.kind(),
                }),
            },
            KIND_ATTRIBUTE => Err(AccessError::ReadOnly {
                name: name.to_string(),
            }),
            _ => self.attributes.write(name, value),
        }
    }

    fn record_mut(&mut self, name: &str) -> Option<&mut AttributeMap> {
        self.attributes.record_mut(name)
    }
}
