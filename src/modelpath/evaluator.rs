//! Model path evaluation.
//!
//! Resolution happens in two phases. The structural prefix selects a node
//! (absolute descent from the root, scope search, or a search within the
//! start node's own subtree), then the attribute chain is read name by name.
//! A `Value::Node` link met along the chain continues on the linked model.

use super::ast::{Anchor, ModelPath};
use super::error::PathError;
use super::parser::Parser;
use crate::attribute::{AccessError, Attributes, Value};
use crate::query::Selector;
use crate::tree::{ModelTree, NodeId, TreeError};

/// The outcome of a successful `get`.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// The path named a model.
    Node(NodeId),
    /// The path named an attribute value.
    Value(Value),
}

impl Resolved {
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Resolved::Node(id) => Some(*id),
            Resolved::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Resolved::Value(value) => Some(value),
            Resolved::Node(_) => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Resolved::Value(value) => Some(value),
            Resolved::Node(_) => None,
        }
    }
}

/// Where a `set` lands: a model, the nested records to step through on it,
/// and the attribute to write.
struct WriteTarget {
    owner: NodeId,
    records: Vec<String>,
    attribute: String,
}

pub struct Evaluator<'a> {
    tree: &'a ModelTree,
}

impl<'a> Evaluator<'a> {
    pub fn new(tree: &'a ModelTree) -> Self {
        Evaluator { tree }
    }

    /// Parses and evaluates `path` relative to `start`.
    pub fn get(&self, start: NodeId, path: &str) -> Result<Resolved, PathError> {
        let parsed = Parser::parse(path)?;
        self.evaluate(start, &parsed)
    }

    /// Evaluates an already parsed path relative to `start`.
    pub fn evaluate(&self, start: NodeId, path: &ModelPath) -> Result<Resolved, PathError> {
        let (node, chain) = self.resolve(start, path)?;
        if chain.is_empty() {
            return Ok(Resolved::Node(node));
        }

        let mut current = Value::Node(node);
        for segment in &chain {
            current = self
                .read_member(&current, segment)
                .ok_or_else(|| not_found(path, segment))?;
        }

        Ok(match current {
            Value::Node(id) => Resolved::Node(id),
            value => Resolved::Value(value),
        })
    }

    /// Resolves the structural prefix of `path`.
    ///
    /// Returns the selected node and the attribute chain still to be read.
    /// For absolute paths the chain starts with the first name that did not
    /// match a child.
    pub fn resolve(
        &self,
        start: NodeId,
        path: &ModelPath,
    ) -> Result<(NodeId, Vec<String>), PathError> {
        if !self.tree.contains(start) {
            return Err(TreeError::UnknownNode(start).into());
        }

        match &path.anchor {
            Anchor::Absolute(segments) => {
                let root = self.tree.root();
                let Some((first, rest)) = segments.split_first() else {
                    return Err(PathError::InvalidSyntax {
                        message: "Absolute path has no segments".to_string(),
                    });
                };
                if self.tree.name_of(root) != first.as_str() {
                    return Err(not_found(path, first));
                }

                let mut current = root;
                let mut matched = 0;
                for segment in rest {
                    match self.tree.first_child(current, &Selector::name(segment.as_str())) {
                        Some(child) => {
                            current = child;
                            matched += 1;
                        }
                        None => break,
                    }
                }

                let mut chain = rest[matched..].to_vec();
                chain.extend(path.chain.iter().cloned());
                Ok((current, chain))
            }
            Anchor::Scoped(name) => self
                .tree
                .scoped_find(start, &Selector::name(name.as_str()))
                .map(|node| (node, path.chain.clone()))
                .ok_or_else(|| not_found(path, name)),
            Anchor::Relative(name) => self
                .tree
                .find_descendant(start, &Selector::name(name.as_str()))
                .map(|node| (node, path.chain.clone()))
                .ok_or_else(|| not_found(path, name)),
        }
    }

    fn read_member(&self, subject: &Value, name: &str) -> Option<Value> {
        match subject {
            Value::Node(id) => self.tree.node(*id)?.read(name),
            Value::Record(map) => map.read(name),
            _ => None,
        }
    }

    /// Works out which attribute a `set` on `path` would write.
    fn write_target(&self, start: NodeId, path: &ModelPath) -> Result<WriteTarget, PathError> {
        let (node, chain) = self.resolve(start, path)?;
        let Some((attribute, prefix)) = chain.split_last() else {
            return Err(PathError::NodeTarget {
                path: path.to_string(),
            });
        };

        let mut owner = node;
        let mut records = Vec::new();
        let mut current = Value::Node(node);
        for segment in prefix {
            let next = self
                .read_member(&current, segment)
                .ok_or_else(|| not_found(path, segment))?;
            match &next {
                Value::Node(id) => {
                    owner = *id;
                    records.clear();
                }
                Value::Record(_) => records.push(segment.clone()),
                _ => {}
            }
            current = next;
        }

        if !matches!(current, Value::Node(_) | Value::Record(_)) {
            return Err(not_found(path, attribute));
        }

        Ok(WriteTarget {
            owner,
            records,
            attribute: attribute.clone(),
        })
    }
}

fn not_found(path: &ModelPath, segment: &str) -> PathError {
    PathError::NotFound {
        path: path.to_string(),
        segment: segment.to_string(),
    }
}

/// Parses `path` and writes `value` to the attribute it names.
///
/// Resolution is identical to [`Evaluator::get`]; the path must end in an
/// attribute, and only that attribute changes. Returns the value as stored,
/// read back from the written model, so a write that renames the model
/// still reports its result.
pub fn set(
    tree: &mut ModelTree,
    start: NodeId,
    path: &str,
    value: Value,
) -> Result<Value, PathError> {
    let parsed = Parser::parse(path)?;
    let target = Evaluator::new(tree).write_target(start, &parsed)?;

    let node = tree
        .node_mut(target.owner)
        .ok_or(TreeError::UnknownNode(target.owner))?;
    let mut subject: &mut dyn Attributes = node;
    for record in &target.records {
        subject = subject
            .record_mut(record)
            .ok_or_else(|| not_found(&parsed, record))?;
    }

    subject
        .write(&target.attribute, value)
        .map_err(|source| match source {
            AccessError::NotFound { name } => not_found(&parsed, &name),
            source => PathError::Access {
                path: parsed.to_string(),
                source,
            },
        })?;
    subject
        .read(&target.attribute)
        .ok_or_else(|| not_found(&parsed, &target.attribute))
}

impl ModelTree {
    /// Reads the model or attribute value `path` names, relative to `start`.
    ///
    /// # Example
    ///
    /// ```
    /// use modeltree::tree::{ModelTree, NodeSpec};
    /// use modeltree::attribute::Value;
    ///
    /// let mut tree = ModelTree::new(NodeSpec::new("Simulations", "Simulations")).unwrap();
    /// let weather = tree
    ///     .add_child(tree.root(), NodeSpec::new("WeatherFile", "WeatherFile").with_attribute("Rain", 0.0))
    ///     .unwrap();
    ///
    /// let root = tree.root();
    /// assert_eq!(tree.get(root, "WeatherFile").unwrap().as_node(), Some(weather));
    ///
    /// tree.set(root, ".Simulations.WeatherFile.Rain", Value::Float(12.5)).unwrap();
    /// assert_eq!(
    ///     tree.get(root, "WeatherFile.Rain").unwrap().into_value(),
    ///     Some(Value::Float(12.5))
    /// );
    /// ```
    pub fn get(&self, start: NodeId, path: &str) -> Result<Resolved, PathError> {
        Evaluator::new(self).get(start, path)
    }

    /// Writes `value` to the attribute `path` names, relative to `start`,
    /// and returns the value as stored.
    pub fn set(&mut self, start: NodeId, path: &str, value: Value) -> Result<Value, PathError> {
        set(self, start, path, value)
    }
}
