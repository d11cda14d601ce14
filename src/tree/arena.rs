//! The model tree.
//!
//! [`ModelTree`] owns every node in an arena indexed by [`NodeId`]. Children
//! are ordered id lists; parents are plain ids, so there is no ownership
//! cycle between a node and its parent. Removed slots are left empty and
//! never reused.
//!
//! # Example
//!
//! ```
//! use modeltree::tree::{ModelTree, NodeSpec};
//!
//! let mut tree = ModelTree::new(NodeSpec::new("Simulations", "Simulations")).unwrap();
//! let test = tree.add_child(tree.root(), NodeSpec::new("Test", "Simulation")).unwrap();
//! let clock = tree.add_child(test, NodeSpec::new("Clock", "Clock")).unwrap();
//!
//! assert_eq!(tree.children_of(test), &[clock]);
//! assert_eq!(tree.parent(clock), Some(test));
//!
//! tree.remove(test).unwrap();
//! assert!(tree.node(clock).is_none());
//! ```

use super::error::TreeError;
use super::kinds::KindTable;
use super::node::{is_valid_name, Node, NodeId, NodeSpec};

/// A rooted, ordered tree of models.
#[derive(Debug, Clone)]
pub struct ModelTree {
    nodes: Vec<Option<Node>>,
    root: NodeId,
    kinds: KindTable,
}

impl ModelTree {
    /// Creates a tree holding only `root`, with an empty kind table.
    pub fn new(root: NodeSpec) -> Result<Self, TreeError> {
        Self::with_kinds(KindTable::new(), root)
    }

    /// Creates a tree whose nodes are classified by `kinds`.
    ///
    /// Scope-boundary flags are resolved from the table when each node is
    /// created.
    pub fn with_kinds(kinds: KindTable, root: NodeSpec) -> Result<Self, TreeError> {
        check_name(&root.name)?;
        let boundary = kinds.is_scope_boundary(&root.kind);
        Ok(Self {
            nodes: vec![Some(Node::from_spec(root, boundary))],
            root: NodeId(0),
            kinds,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn kinds(&self) -> &KindTable {
        &self.kinds
    }

    /// Returns the node for `id`, or `None` if it was removed.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)?.as_ref()
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)?.as_mut()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Number of live nodes, detached subtrees included.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    /// A tree always holds at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Returns the ordered children of `id`; empty for unknown ids.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|node| node.children()).unwrap_or(&[])
    }

    /// Returns the name of `id`; empty for unknown ids.
    pub fn name_of(&self, id: NodeId) -> &str {
        self.node(id).map(|node| node.name()).unwrap_or("")
    }

    /// Returns true if `ancestor` is `id` or lies on its parent chain.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    fn require(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.node(id).ok_or(TreeError::UnknownNode(id))
    }

    fn check_parent_kind(&self, child_kind: &str, parent: &Node) -> Result<(), TreeError> {
        if self.kinds.accepts_parent(child_kind, parent.kind()) {
            Ok(())
        } else {
            Err(TreeError::InvalidParent {
                child_kind: child_kind.to_string(),
                parent_kind: parent.kind().to_string(),
            })
        }
    }

    /// Appends a new node built from `spec` to `parent`'s children.
    pub fn add_child(&mut self, parent: NodeId, spec: NodeSpec) -> Result<NodeId, TreeError> {
        let index = self.require(parent)?.children.len();
        self.insert_child(parent, index, spec)
    }

    /// Creates a node from `spec` and inserts it at `index` among `parent`'s
    /// children.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        spec: NodeSpec,
    ) -> Result<NodeId, TreeError> {
        let parent_node = self.require(parent)?;
        let len = parent_node.children.len();
        if index > len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        check_name(&spec.name)?;
        self.check_parent_kind(&spec.kind, parent_node)?;

        let boundary = self.kinds.is_scope_boundary(&spec.kind);
        let id = NodeId(self.nodes.len());
        let mut node = Node::from_spec(spec, boundary);
        node.parent = Some(parent);
        self.nodes.push(Some(node));

        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.insert(index, id);
        }
        Ok(id)
    }

    /// Unlinks `id` from its parent, keeping its subtree alive in the arena.
    ///
    /// Detaching an already detached node is a no-op.
    pub fn detach(&mut self, id: NodeId) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RootAttach);
        }
        let Some(parent) = self.require(id)?.parent else {
            return Ok(());
        };

        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.retain(|child| *child != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
        Ok(())
    }

    /// Links a detached node under `parent` at `index`.
    pub fn attach(&mut self, id: NodeId, parent: NodeId, index: usize) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RootAttach);
        }
        let node = self.require(id)?;
        if node.parent.is_some() {
            return Err(TreeError::AlreadyAttached(id));
        }
        self.check_attach(id, parent, index)?;

        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.insert(index, id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = Some(parent);
        }
        Ok(())
    }

    /// Checks everything `attach` needs from the target position.
    fn check_attach(&self, id: NodeId, parent: NodeId, index: usize) -> Result<(), TreeError> {
        let node = self.require(id)?;
        let parent_node = self.require(parent)?;
        if self.is_ancestor_or_self(id, parent) {
            return Err(TreeError::CycleDetected { node: id, parent });
        }
        let len = parent_node.children.len();
        if index > len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        self.check_parent_kind(node.kind(), parent_node)
    }

    /// Moves `id` (with its subtree) to `index` among `new_parent`'s
    /// children.
    ///
    /// `index` is interpreted after `id` has been taken out of its current
    /// parent, which matters when moving within the same parent.
    pub fn move_node(
        &mut self,
        id: NodeId,
        new_parent: NodeId,
        index: usize,
    ) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RootAttach);
        }
        let node = self.require(id)?;
        let parent_node = self.require(new_parent)?;
        if self.is_ancestor_or_self(id, new_parent) {
            return Err(TreeError::CycleDetected {
                node: id,
                parent: new_parent,
            });
        }
        let mut len = parent_node.children.len();
        if node.parent == Some(new_parent) {
            len -= 1;
        }
        if index > len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        self.check_parent_kind(node.kind(), parent_node)?;

        self.detach(id)?;
        self.attach(id, new_parent, index)
    }

    /// Detaches `id` and drops its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RootRemoval);
        }
        self.detach(id)?;

        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if let Some(node) = self.nodes.get_mut(current.0).and_then(Option::take) {
                pending.extend(node.children);
            }
        }
        Ok(())
    }

    /// Renames `id`. Names need not be unique.
    pub fn rename(&mut self, id: NodeId, name: impl Into<String>) -> Result<(), TreeError> {
        let name = name.into();
        check_name(&name)?;
        let node = self.node_mut(id).ok_or(TreeError::UnknownNode(id))?;
        node.name = name;
        Ok(())
    }
}

fn check_name(name: &str) -> Result<(), TreeError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(TreeError::InvalidName(name.to_string()))
    }
}
