//! Model path string parser.

use super::ast::{Anchor, ModelPath};
use super::error::PathError;

/// Parser for model path strings.
pub struct Parser {
    input: Vec<char>,
    position: usize,
}

impl Parser {
    /// Creates a new parser for the given path string.
    pub fn new(query: &str) -> Self {
        Self {
            input: query.chars().collect(),
            position: 0,
        }
    }

    /// Parses the path string into a ModelPath.
    pub fn parse(query: &str) -> Result<ModelPath, PathError> {
        let mut parser = Parser::new(query);
        parser.parse_path()
    }

    fn parse_path(&mut self) -> Result<ModelPath, PathError> {
        self.skip_whitespace();
        if self.is_eof() {
            return Err(PathError::InvalidSyntax {
                message: "Path must not be empty".to_string(),
            });
        }

        match self.peek() {
            Some('.') => {
                self.next();
                let mut segments = vec![self.parse_name()?];
                segments.extend(self.parse_chain()?);
                Ok(ModelPath::new(Anchor::Absolute(segments), Vec::new()))
            }
            Some('[') => {
                let name = self.parse_qualifier()?;
                let chain = self.parse_chain()?;
                Ok(ModelPath::new(Anchor::Scoped(name), chain))
            }
            _ => {
                let name = self.parse_name()?;
                let chain = self.parse_chain()?;
                Ok(ModelPath::new(Anchor::Relative(name), chain))
            }
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Returns the next character and advances position.
    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        Some(ch)
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.next();
            } else {
                break;
            }
        }
    }

    /// Checks if we've reached the end of input.
    fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Expects a specific character and advances, or returns an error.
    fn expect(&mut self, expected: char) -> Result<(), PathError> {
        self.skip_whitespace();
        let pos = self.position;
        match self.next() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(PathError::UnexpectedToken {
                position: pos,
                found: ch.to_string(),
                expected: format!("'{}'", expected),
            }),
            None => Err(PathError::UnexpectedEnd {
                expected: format!("'{}'", expected),
            }),
        }
    }

    /// Parses a model or attribute name.
    ///
    /// Names run up to the next `.`, `[` or `]`; surrounding whitespace is
    /// dropped, inner whitespace kept.
    fn parse_name(&mut self) -> Result<String, PathError> {
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if matches!(ch, '.' | '[' | ']') {
                break;
            }
            name.push(ch);
            self.next();
        }

        let name = name.trim();
        if !name.is_empty() {
            return Ok(name.to_string());
        }

        match self.peek() {
            None => Err(PathError::UnexpectedEnd {
                expected: "name".to_string(),
            }),
            Some('[') => Err(Self::misplaced_qualifier()),
            Some(ch) => Err(PathError::UnexpectedToken {
                position: self.position,
                found: ch.to_string(),
                expected: "name".to_string(),
            }),
        }
    }

    /// Parses a scope qualifier: `[Name]`
    fn parse_qualifier(&mut self) -> Result<String, PathError> {
        self.expect('[')?;
        let name = self.parse_name()?;
        self.expect(']')?;
        Ok(name)
    }

    /// Parses the remaining `.name` segments up to the end of input.
    fn parse_chain(&mut self) -> Result<Vec<String>, PathError> {
        let mut chain = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => break,
                Some('.') => {
                    self.next();
                    chain.push(self.parse_name()?);
                }
                Some('[') => return Err(Self::misplaced_qualifier()),
                Some(ch) => {
                    return Err(PathError::UnexpectedToken {
                        position: self.position,
                        found: ch.to_string(),
                        expected: "'.' or end of path".to_string(),
                    })
                }
            }
        }
        Ok(chain)
    }

    fn misplaced_qualifier() -> PathError {
        PathError::InvalidSyntax {
            message: "Scope qualifier '[...]' is only allowed as the first segment".to_string(),
        }
    }
}
