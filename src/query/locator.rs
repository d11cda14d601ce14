//! Structural lookups: paths, ancestors, children, descendants, siblings and
//! scope-restricted find.

use super::Selector;
use crate::tree::{ModelTree, NodeId};

/// Iterator over the strict ancestors of a node, nearest first.
pub struct Ancestors<'a> {
    tree: &'a ModelTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

impl ModelTree {
    fn kind_matches(&self, id: NodeId, kind: Option<&str>) -> bool {
        match kind {
            Some(kind) => self
                .node(id)
                .map(|node| self.kinds().is_a(node.kind(), kind))
                .unwrap_or(false),
            None => true,
        }
    }

    /// Returns `"."` followed by the dot-joined names from the root down to
    /// `id`, e.g. `.Simulations.Test.Field2`.
    pub fn full_path(&self, id: NodeId) -> Option<String> {
        let node = self.node(id)?;
        let mut names: Vec<&str> = self.ancestors(id).map(|a| self.name_of(a)).collect();
        names.reverse();
        names.push(node.name());

        let mut path = String::new();
        for name in names {
            path.push('.');
            path.push_str(name);
        }
        Some(path)
    }

    /// Iterates over `id`'s parent, grandparent and so on up to the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Returns the closest strict ancestor whose kind is `kind` or derives
    /// from it.
    pub fn nearest_ancestor_of_kind(&self, id: NodeId, kind: &str) -> Option<NodeId> {
        self.ancestors(id)
            .find(|ancestor| self.kind_matches(*ancestor, Some(kind)))
    }

    /// Returns the first node in `id`'s visibility set matching `selector`.
    pub fn scoped_find(&self, id: NodeId, selector: &Selector) -> Option<NodeId> {
        self.scope_visible(id)
            .into_iter()
            .find(|candidate| selector.matches(self, *candidate))
    }

    /// Returns `id`'s visibility set, optionally restricted to a kind.
    pub fn scoped_find_all(&self, id: NodeId, kind: Option<&str>) -> Vec<NodeId> {
        let mut visible = self.scope_visible(id);
        visible.retain(|candidate| self.kind_matches(*candidate, kind));
        visible
    }

    /// Returns `id`'s direct children in order, optionally restricted to a
    /// kind.
    pub fn children(&self, id: NodeId, kind: Option<&str>) -> Vec<NodeId> {
        self.children_of(id)
            .iter()
            .copied()
            .filter(|child| self.kind_matches(*child, kind))
            .collect()
    }

    /// Returns the first direct child matching `selector`.
    pub fn first_child(&self, id: NodeId, selector: &Selector) -> Option<NodeId> {
        self.children_of(id)
            .iter()
            .copied()
            .find(|child| selector.matches(self, *child))
    }

    /// Returns every node below `id` in pre-order, `id` excluded.
    ///
    /// This is a structural walk; scope boundaries do not stop it.
    pub fn descendants(&self, id: NodeId, kind: Option<&str>) -> Vec<NodeId> {
        let mut results = Vec::new();
        self.walk_descendants(id, |candidate| {
            if self.kind_matches(candidate, kind) {
                results.push(candidate);
            }
            false
        });
        results
    }

    /// Returns the first node below `id`, in pre-order, matching `selector`.
    pub fn find_descendant(&self, id: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut found = None;
        self.walk_descendants(id, |candidate| {
            if selector.matches(self, candidate) {
                found = Some(candidate);
                return true;
            }
            false
        });
        found
    }

    /// Pre-order walk below `id`; `visit` returns true to stop early.
    fn walk_descendants<F>(&self, id: NodeId, mut visit: F)
    where
        F: FnMut(NodeId) -> bool,
    {
        let mut pending: Vec<NodeId> = self.children_of(id).iter().rev().copied().collect();
        while let Some(current) = pending.pop() {
            if visit(current) {
                return;
            }
            pending.extend(self.children_of(current).iter().rev().copied());
        }
    }

    /// Returns the other children of `id`'s parent, in order. The root has
    /// no siblings.
    pub fn siblings(&self, id: NodeId) -> Vec<NodeId> {
        match self.parent(id) {
            Some(parent) => self
                .children_of(parent)
                .iter()
                .copied()
                .filter(|sibling| *sibling != id)
                .collect(),
            None => Vec::new(),
        }
    }
}
