//! Structural and scope-aware queries over a [`ModelTree`].
//!
//! Queries are inherent methods on `ModelTree`, split by concern:
//!
//! - [`scope`] - the visibility set of a node
//! - [`locator`] - ancestors, children, descendants, siblings, scoped find
//!
//! Every query is a pure function of the current tree shape. Nothing is
//! cached, so results always reflect the latest mutation. Unknown or removed
//! ids yield empty results rather than errors.

pub mod locator;
pub mod scope;

use crate::tree::{ModelTree, NodeId};

pub use locator::Ancestors;

/// Matches nodes by exact name, by kind (subkinds included), or both.
///
/// An empty selector matches every node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    name: Option<String>,
    kind: Option<String>,
}

impl Selector {
    /// A selector matching any node.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self::any().with_name(name)
    }

    pub fn kind(kind: impl Into<String>) -> Self {
        Self::any().with_kind(kind)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Returns true if `id` is a live node satisfying every given criterion.
    pub fn matches(&self, tree: &ModelTree, id: NodeId) -> bool {
        let Some(node) = tree.node(id) else {
            return false;
        };
        if let Some(name) = &self.name {
            if node.name() != name {
                return false;
            }
        }
        if let Some(kind) = &self.kind {
            if !tree.kinds().is_a(node.kind(), kind) {
                return false;
            }
        }
        true
    }
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Selector::name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{KindDecl, KindTable, NodeSpec};

    #[test]
    fn test_selector_matches() {
        let mut kinds = KindTable::new();
        kinds.declare(KindDecl::new("Zone")).unwrap();
        kinds
            .declare(KindDecl::new("Simulation").bases(["Zone"]))
            .unwrap();
        let mut tree = ModelTree::with_kinds(kinds, NodeSpec::new("Simulations", "Simulations")).unwrap();
        let test = tree
            .add_child(tree.root(), NodeSpec::new("Test", "Simulation"))
            .unwrap();

        assert!(Selector::any().matches(&tree, test));
        assert!(Selector::name("Test").matches(&tree, test));
        assert!(!Selector::name("test").matches(&tree, test));
        assert!(Selector::kind("Zone").matches(&tree, test));
        assert!(Selector::kind("Zone").with_name("Test").matches(&tree, test));
        assert!(!Selector::kind("Zone").with_name("Other").matches(&tree, test));
        assert!(!Selector::kind("Zone").matches(&tree, tree.root()));
    }
}
