//! Model path parser and evaluator.
//!
//! A model path locates a model in a [`ModelTree`](crate::tree::ModelTree)
//! and optionally drills into its attributes.
//!
//! # Supported Syntax
//!
//! - `.Root.A.B` - Absolute path, descended from the root by child name
//! - `[Name]` - Scope-qualified: the model called `Name` visible from the
//!   start node
//! - `Name` - Relative: the first model called `Name` below the start node
//! - `.attr` - Any of the above may be followed by attribute names
//!
//! # Examples
//!
//! ```text
//! .Simulations.Test.Field2.Graph1      - a model by absolute path
//! .Simulations.Test.Field1.Report.Name - trailing names that are not
//!                                        children are read as attributes
//! [Soil].Water.Name                    - scope search, then two reads
//! Field1Report.Name                    - a model in the caller's subtree
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod parser;

pub use ast::{Anchor, ModelPath};
pub use error::PathError;
pub use evaluator::{Evaluator, Resolved};
pub use parser::Parser;
