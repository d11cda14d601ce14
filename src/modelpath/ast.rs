//! Parsed form of model path expressions.

use std::fmt;

/// How the structural prefix of a path selects its node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// `.Root.A.B` - names descended from the root; unmatched trailing names
    /// become attribute reads at evaluation time
    Absolute(Vec<String>),
    /// `[Name]` - a node found through the scope visibility rule
    Scoped(String),
    /// `Name` - a node found within the start node's own subtree
    Relative(String),
}

/// A complete model path: structural prefix plus attribute chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPath {
    pub anchor: Anchor,
    /// Attribute names read (or written) after the node resolves.
    pub chain: Vec<String>,
}

impl ModelPath {
    pub fn new(anchor: Anchor, chain: Vec<String>) -> Self {
        Self { anchor, chain }
    }

    pub fn is_absolute(&self) -> bool {
        matches!(self.anchor, Anchor::Absolute(_))
    }
}

impl fmt::Display for ModelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.anchor {
            Anchor::Absolute(segments) => {
                for segment in segments {
                    write!(f, ".{}", segment)?;
                }
            }
            Anchor::Scoped(name) => write!(f, "[{}]", name)?,
            Anchor::Relative(name) => write!(f, "{}", name)?,
        }
        for segment in &self.chain {
            write!(f, ".{}", segment)?;
        }
        Ok(())
    }
}
