//! Path expressions over normalized source trees.
//!
//! The supported grammar is the slice the engine generates:
//!
//! ```text
//! expr      := step+
//! step      := ("//" | "/") nametest predicate*
//! nametest  := name | "*"
//! predicate := "[" "@value='" text "'" "]"
//!            | "[" expr "]"
//! ```
//!
//! `/` selects children, `//` selects descendants at any depth. A nested
//! path predicate holds when it matches at least one node relative to the
//! candidate. `@value` compares against the node value (string literals
//! compare without their quotes).

use std::fmt;

use ripple_core::QueryError;

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    pub(crate) steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Step {
    pub axis: Axis,
    pub name: NameTest,
    pub predicates: Vec<Predicate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NameTest {
    Any,
    Named(String),
}

impl NameTest {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Named(n) => n == name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Predicate {
    /// `[@value='…']`
    Value(String),
    /// `[/…]` or `[//…]`
    Path(PathExpr),
}

impl PathExpr {
    /// Parse an expression, failing with the offending position on bad input.
    pub fn parse(input: &str) -> Result<Self, QueryError> {
        let mut parser = Parser {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        };
        let expr = parser.expr()?;
        if parser.pos != parser.bytes.len() {
            return Err(parser.error("trailing input"));
        }
        Ok(expr)
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            match step.axis {
                Axis::Child => write!(f, "/")?,
                Axis::Descendant => write!(f, "//")?,
            }
            match &step.name {
                NameTest::Any => write!(f, "*")?,
                NameTest::Named(n) => write!(f, "{n}")?,
            }
            for predicate in &step.predicates {
                match predicate {
                    Predicate::Value(v) => write!(f, "[@value='{v}']")?,
                    Predicate::Path(p) => write!(f, "[{p}]")?,
                }
            }
        }
        Ok(())
    }
}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, message: impl Into<String>) -> QueryError {
        QueryError::InvalidExpression {
            expression: self.input.to_string(),
            message: format!("{} at byte {}", message.into(), self.pos),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expr(&mut self) -> Result<PathExpr, QueryError> {
        let mut steps = Vec::new();
        while self.peek() == Some(b'/') {
            steps.push(self.step()?);
        }
        if steps.is_empty() {
            return Err(self.error("expected `/` or `//`"));
        }
        Ok(PathExpr { steps })
    }

    fn step(&mut self) -> Result<Step, QueryError> {
        self.pos += 1; // leading '/'
        let axis = if self.eat(b'/') {
            Axis::Descendant
        } else {
            Axis::Child
        };
        let name = self.name_test()?;
        let mut predicates = Vec::new();
        while self.eat(b'[') {
            predicates.push(self.predicate()?);
            if !self.eat(b']') {
                return Err(self.error("expected `]`"));
            }
        }
        Ok(Step {
            axis,
            name,
            predicates,
        })
    }

    fn name_test(&mut self) -> Result<NameTest, QueryError> {
        if self.eat(b'*') {
            return Ok(NameTest::Any);
        }
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected a node name or `*`"));
        }
        Ok(NameTest::Named(self.input[start..self.pos].to_string()))
    }

    fn predicate(&mut self) -> Result<Predicate, QueryError> {
        if self.peek() == Some(b'@') {
            let literal = "@value='";
            if !self.input[self.pos..].starts_with(literal) {
                return Err(self.error("expected `@value='`"));
            }
            self.pos += literal.len();
            let start = self.pos;
            while self.peek().is_some_and(|b| b != b'\'') {
                self.pos += 1;
            }
            if !self.eat(b'\'') {
                return Err(self.error("unterminated value literal"));
            }
            return Ok(Predicate::Value(self.input[start..self.pos - 1].to_string()));
        }
        if self.peek() == Some(b'/') {
            return Ok(Predicate::Path(self.expr()?));
        }
        Err(self.error("expected `@value=` or a nested path"))
    }
}
