//! Name-indexed access to runtime attributes.
//!
//! [`Attributes`] is the capability the path evaluator needs from anything it
//! drills into: read a named member, write a named member, and step into a
//! nested record for chained writes. [`AttributeMap`] is the ordered record
//! that backs every model's attributes.

use indexmap::IndexMap;
use thiserror::Error;

use super::value::{Value, ValueKind};

/// Errors reported by attribute reads and writes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AccessError {
    /// No attribute with this name exists on the subject.
    #[error("attribute '{name}' not found")]
    NotFound { name: String },
    /// The written value does not match the attribute's declared type.
    #[error("attribute '{name}' expects {expected}, got {found}")]
    TypeMismatch {
        name: String,
        expected: ValueKind,
        found: ValueKind,
    },
    /// The value has the right type but is not acceptable for the attribute.
    #[error("'{value}' is not a valid value for attribute '{name}'")]
    InvalidValue { name: String, value: String },
    /// The attribute exists but cannot be written.
    #[error("attribute '{name}' is read-only")]
    ReadOnly { name: String },
}

/// Whether an attribute can be written after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    #[default]
    ReadWrite,
    ReadOnly,
}

/// A single named attribute: its current value, declared kind and access.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    value: Value,
    declared: ValueKind,
    access: Access,
}

impl Attribute {
    pub fn new(value: Value, access: Access) -> Self {
        Self {
            declared: value.kind(),
            value,
            access,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn declared(&self) -> ValueKind {
        self.declared
    }

    pub fn access(&self) -> Access {
        self.access
    }
}

/// Dynamic read/write of named members.
pub trait Attributes {
    /// Reads the member called `name`.
    fn read(&self, name: &str) -> Option<Value>;

    /// Replaces the member called `name`, checking access and type.
    fn write(&mut self, name: &str, value: Value) -> Result<(), AccessError>;

    /// Returns the nested record stored under `name`, for chained writes.
    fn record_mut(&mut self, name: &str) -> Option<&mut AttributeMap>;
}

/// An insertion-ordered record of attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeMap {
    entries: IndexMap<String, Attribute>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a writable attribute, replacing any previous declaration.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.declare(name, value, Access::ReadWrite);
    }

    /// Declares an attribute with explicit access.
    pub fn declare(&mut self, name: impl Into<String>, value: impl Into<Value>, access: Access) {
        self.entries
            .insert(name.into(), Attribute::new(value.into(), access));
    }

    /// Builder-style variant of [`AttributeMap::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(name, attribute)| (name.as_str(), &attribute.value))
    }
}

impl Attributes for AttributeMap {
    fn read(&self, name: &str) -> Option<Value> {
        self.entries.get(name).map(|attribute| attribute.value.clone())
    }

    fn write(&mut self, name: &str, value: Value) -> Result<(), AccessError> {
        let attribute = self
            .entries
            .get_mut(name)
            .ok_or_else(|| AccessError::NotFound {
                name: name.to_string(),
            })?;

        if attribute.access == Access::ReadOnly {
            return Err(AccessError::ReadOnly {
                name: name.to_string(),
            });
        }

        let found = value.kind();
        let value = value
            .coerce_to(attribute.declared)
            .map_err(|_| AccessError::TypeMismatch {
                name: name.to_string(),
                expected: attribute.declared,
                found,
            })?;

        // A null slot takes the type of its first real value
        if attribute.declared == ValueKind::Null {
            attribute.declared = value.kind();
        }
        attribute.value = value;
        Ok(())
    }

    fn record_mut(&mut self, name: &str) -> Option<&mut AttributeMap> {
        match &mut self.entries.get_mut(name)?.value {
            Value::Record(map) => Some(map),
            _ => None,
        }
    }
}
