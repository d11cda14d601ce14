//! Link resolution for model wiring.
//!
//! Models declare references to collaborators ("links") by kind and,
//! optionally, by name. Whoever wires them up resolves each request through
//! the scope rule and decides what a missing collaborator means through a
//! [`MissingPolicy`]. Resource items are a two-step variant: a scope-visible
//! group of a given kind, then a named item directly inside it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::query::Selector;
use crate::tree::{ModelTree, NodeId};

/// What to do when a link cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Leave the link empty.
    Ignore,
    /// Leave the link empty and emit a warning.
    Warn,
    /// Treat the missing link as a configuration error.
    #[default]
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error(
        "no {kind} visible from '{from}'{}",
        .name.as_ref().map(|n| format!(" named '{}'", n)).unwrap_or_default()
    )]
    Missing {
        from: String,
        kind: String,
        name: Option<String>,
    },
    #[error("no enclosing {kind} for '{from}'")]
    MissingParent { from: String, kind: String },
    #[error("no {group_kind} group visible from '{from}'")]
    MissingGroup { from: String, group_kind: String },
    #[error("{group} has no item named '{item}'")]
    MissingItem { group: String, item: String },
}

/// A request for a collaborator visible from some model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRequest {
    pub kind: String,
    pub name: Option<String>,
    pub policy: MissingPolicy,
}

impl LinkRequest {
    /// A required link to the first visible model of `kind`.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: None,
            policy: MissingPolicy::Fail,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn policy(mut self, policy: MissingPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn selector(&self) -> Selector {
        let selector = Selector::kind(self.kind.as_str());
        match &self.name {
            Some(name) => selector.with_name(name.as_str()),
            None => selector,
        }
    }
}

fn describe(tree: &ModelTree, id: NodeId) -> String {
    tree.full_path(id).unwrap_or_else(|| id.to_string())
}

fn apply_policy(policy: MissingPolicy, error: LinkError) -> Result<Option<NodeId>, LinkError> {
    match policy {
        MissingPolicy::Ignore => Ok(None),
        MissingPolicy::Warn => {
            tracing::warn!("{}", error);
            Ok(None)
        }
        MissingPolicy::Fail => Err(error),
    }
}

/// Resolves `request` from `from` using the scope visibility rule.
pub fn resolve_link(
    tree: &ModelTree,
    from: NodeId,
    request: &LinkRequest,
) -> Result<Option<NodeId>, LinkError> {
    if let Some(found) = tree.scoped_find(from, &request.selector()) {
        tracing::trace!(from = %from, found = %found, kind = %request.kind, "link resolved");
        return Ok(Some(found));
    }
    apply_policy(
        request.policy,
        LinkError::Missing {
            from: describe(tree, from),
            kind: request.kind.clone(),
            name: request.name.clone(),
        },
    )
}

/// Finds the closest enclosing model of `kind`, e.g. the zone a model
/// lives in.
pub fn parent_of_kind(
    tree: &ModelTree,
    from: NodeId,
    kind: &str,
    policy: MissingPolicy,
) -> Result<Option<NodeId>, LinkError> {
    match tree.nearest_ancestor_of_kind(from, kind) {
        Some(found) => Ok(Some(found)),
        None => apply_policy(
            policy,
            LinkError::MissingParent {
                from: describe(tree, from),
                kind: kind.to_string(),
            },
        ),
    }
}

/// Finds a resource item: the first scope-visible group of `group_kind`,
/// then its first direct child named `item`.
///
/// `group_policy` applies when no group is visible, `item_policy` when the
/// group exists but lacks the item.
pub fn resolve_item(
    tree: &ModelTree,
    from: NodeId,
    group_kind: &str,
    item: &str,
    group_policy: MissingPolicy,
    item_policy: MissingPolicy,
) -> Result<Option<NodeId>, LinkError> {
    let Some(group) = tree.scoped_find(from, &Selector::kind(group_kind)) else {
        return apply_policy(
            group_policy,
            LinkError::MissingGroup {
                from: describe(tree, from),
                group_kind: group_kind.to_string(),
            },
        );
    };

    match tree.first_child(group, &Selector::name(item)) {
        Some(found) => Ok(Some(found)),
        None => apply_policy(
            item_policy,
            LinkError::MissingItem {
                group: describe(tree, group),
                item: item.to_string(),
            },
        ),
    }
}
