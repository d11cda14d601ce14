//! Scope visibility.
//!
//! The visibility set of a node is built like a lexical scope chain. Starting
//! from the first frame, every frame contributes its direct children (each
//! one opaque, never expanded) followed by itself, then the walk moves to the
//! frame's parent:
//!
//! - the first frame is the node itself when it is a scope boundary, its
//!   parent otherwise;
//! - the walk ends after the outermost scope boundary on the frame chain, or
//!   after the root when the chain has no scope boundary.
//!
//! A sibling container is therefore visible as a name while its interior is
//! not, even when it sits directly below the starting node.

use std::collections::HashSet;
use std::iter;

use crate::tree::{ModelTree, NodeId};

impl ModelTree {
    /// Returns the ordered, duplicate-free visibility set of `id`.
    pub fn scope_visible(&self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.node(id) else {
            return Vec::new();
        };
        let first = if node.is_scope_boundary() {
            Some(id)
        } else {
            node.parent()
        };

        let frames: Vec<NodeId> = iter::successors(first, |frame| self.parent(*frame)).collect();
        let Some(last) = frames
            .iter()
            .rposition(|frame| self.is_scope_boundary(*frame))
            .or_else(|| frames.len().checked_sub(1))
        else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut visible = Vec::new();
        for &frame in &frames[..=last] {
            for &child in self.children_of(frame) {
                if seen.insert(child) {
                    visible.push(child);
                }
            }
            if seen.insert(frame) {
                visible.push(frame);
            }
        }
        visible
    }

    fn is_scope_boundary(&self, id: NodeId) -> bool {
        self.node(id)
            .map(|node| node.is_scope_boundary())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::{KindDecl, KindTable, ModelTree, NodeSpec};

    fn names(tree: &ModelTree, ids: &[crate::tree::NodeId]) -> Vec<String> {
        ids.iter().map(|id| tree.name_of(*id).to_string()).collect()
    }

    #[test]
    fn test_without_boundaries_walks_to_root() {
        let mut tree = ModelTree::new(NodeSpec::new("Root", "Folder")).unwrap();
        let a = tree.add_child(tree.root(), NodeSpec::new("A", "Folder")).unwrap();
        let b = tree.add_child(tree.root(), NodeSpec::new("B", "Folder")).unwrap();
        let a1 = tree.add_child(a, NodeSpec::new("A1", "Leaf")).unwrap();
        tree.add_child(b, NodeSpec::new("B1", "Leaf")).unwrap();

        assert_eq!(
            names(&tree, &tree.scope_visible(a1)),
            vec!["A1", "A", "B", "Root"]
        );
    }

    #[test]
    fn test_root_without_boundary_sees_nothing() {
        let mut tree = ModelTree::new(NodeSpec::new("Root", "Folder")).unwrap();
        tree.add_child(tree.root(), NodeSpec::new("A", "Folder")).unwrap();
        assert!(tree.scope_visible(tree.root()).is_empty());
    }

    #[test]
    fn test_boundary_sees_own_children_but_not_grandchildren() {
        let mut kinds = KindTable::new();
        kinds
            .declare(KindDecl::new("Zone").scope_boundary())
            .unwrap();
        let mut tree = ModelTree::with_kinds(kinds, NodeSpec::new("Root", "Folder")).unwrap();
        let zone = tree.add_child(tree.root(), NodeSpec::new("Paddock", "Zone")).unwrap();
        let inner = tree.add_child(zone, NodeSpec::new("Inner", "Zone")).unwrap();
        tree.add_child(inner, NodeSpec::new("Hidden", "Leaf")).unwrap();
        tree.add_child(zone, NodeSpec::new("Crop", "Leaf")).unwrap();

        assert_eq!(
            names(&tree, &tree.scope_visible(zone)),
            vec!["Inner", "Crop", "Paddock"]
        );
    }

    #[test]
    fn test_unknown_node_has_empty_scope() {
        let mut tree = ModelTree::new(NodeSpec::new("Root", "Folder")).unwrap();
        let a = tree.add_child(tree.root(), NodeSpec::new("A", "Folder")).unwrap();
        tree.remove(a).unwrap();
        assert!(tree.scope_visible(a).is_empty());
    }
}
