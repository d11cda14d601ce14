//! Dynamic attributes attached to models.
//!
//! Models expose named, typed runtime attributes that the path language can
//! read and write. Values are held in ordered [`AttributeMap`] records and
//! accessed through the [`Attributes`] trait so the evaluator does not care
//! whether it is looking at a model or a nested record.

pub mod accessor;
pub mod value;

pub use accessor::{Access, AccessError, Attribute, AttributeMap, Attributes};
pub use value::{Value, ValueKind};
