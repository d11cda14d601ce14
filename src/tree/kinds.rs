//! Declared kind hierarchy.
//!
//! Kinds are plain string tags. Subtyping is a finite table: each declared
//! kind lists its base kinds, and the full set of kinds it "is a" is computed
//! once at declaration time. Kinds that were never declared are leaf kinds
//! that are only themselves.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::error::TreeError;

/// A kind declaration, as written in a tree description or config file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KindDecl {
    pub name: String,

    /// Direct base kinds; each must already be declared
    #[serde(default)]
    pub bases: Vec<String>,

    /// Whether nodes of this kind bound visibility
    #[serde(default)]
    pub scope_boundary: bool,

    /// Kinds a node of this kind may be placed under (empty: anywhere)
    #[serde(default)]
    pub valid_parents: Vec<String>,
}

impl KindDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn bases<I, S>(mut self, bases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bases = bases.into_iter().map(Into::into).collect();
        self
    }

    pub fn scope_boundary(mut self) -> Self {
        self.scope_boundary = true;
        self
    }

    pub fn valid_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_parents = parents.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
struct KindInfo {
    /// Every kind this kind is, itself included
    closure: IndexSet<String>,
    scope_boundary: bool,
    valid_parents: Vec<String>,
}

/// The table of declared kinds for one tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KindTable {
    kinds: IndexMap<String, KindInfo>,
}

impl KindTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a kind.
    ///
    /// Fails if the kind is already declared or names an undeclared base.
    pub fn declare(&mut self, decl: KindDecl) -> Result<(), TreeError> {
        if self.kinds.contains_key(&decl.name) {
            return Err(TreeError::DuplicateKind(decl.name));
        }

        let mut closure = IndexSet::new();
        closure.insert(decl.name.clone());
        for base in &decl.bases {
            let info = self
                .kinds
                .get(base)
                .ok_or_else(|| TreeError::UnknownKind(base.clone()))?;
            closure.extend(info.closure.iter().cloned());
        }

        self.kinds.insert(
            decl.name,
            KindInfo {
                closure,
                scope_boundary: decl.scope_boundary,
                valid_parents: decl.valid_parents,
            },
        );
        Ok(())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    /// Returns true if `kind` is `target` or derives from it.
    pub fn is_a(&self, kind: &str, target: &str) -> bool {
        match self.kinds.get(kind) {
            Some(info) => info.closure.contains(target),
            None => kind == target,
        }
    }

    pub fn is_scope_boundary(&self, kind: &str) -> bool {
        self.kinds
            .get(kind)
            .map(|info| info.scope_boundary)
            .unwrap_or(false)
    }

    /// Returns true if a node of `child_kind` may be placed under a node of
    /// `parent_kind`.
    pub fn accepts_parent(&self, child_kind: &str, parent_kind: &str) -> bool {
        match self.kinds.get(child_kind) {
            Some(info) if !info.valid_parents.is_empty() => info
                .valid_parents
                .iter()
                .any(|allowed| self.is_a(parent_kind, allowed)),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> KindTable {
        let mut kinds = KindTable::new();
        kinds.declare(KindDecl::new("Model")).unwrap();
        kinds
            .declare(KindDecl::new("Zone").bases(["Model"]).scope_boundary())
            .unwrap();
        kinds
            .declare(
                KindDecl::new("Simulation")
                    .bases(["Zone"])
                    .scope_boundary()
                    .valid_parents(["Simulations"]),
            )
            .unwrap();
        kinds
    }

    #[test]
    fn test_is_a_transitive() {
        let kinds = table();
        assert!(kinds.is_a("Simulation", "Zone"));
        assert!(kinds.is_a("Simulation", "Model"));
        assert!(kinds.is_a("Zone", "Zone"));
        assert!(!kinds.is_a("Zone", "Simulation"));
    }

    #[test]
    fn test_undeclared_kind_is_only_itself() {
        let kinds = table();
        assert!(kinds.is_a("Clock", "Clock"));
        assert!(!kinds.is_a("Clock", "Model"));
        assert!(!kinds.is_scope_boundary("Clock"));
    }

    #[test]
    fn test_unknown_base_rejected() {
        let mut kinds = table();
        let err = kinds
            .declare(KindDecl::new("Paddock").bases(["Field"]))
            .unwrap_err();
        assert_eq!(err, TreeError::UnknownKind("Field".to_string()));
        assert!(!kinds.contains("Paddock"));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut kinds = table();
        assert_eq!(
            kinds.declare(KindDecl::new("Zone")),
            Err(TreeError::DuplicateKind("Zone".to_string()))
        );
    }

    #[test]
    fn test_valid_parents() {
        let kinds = table();
        assert!(kinds.accepts_parent("Simulation", "Simulations"));
        assert!(!kinds.accepts_parent("Simulation", "Zone"));
        assert!(kinds.accepts_parent("Zone", "Anything"));
    }
}
