//! Syntax tree handed over by the DSL parser
//!
//! The parser lives outside this crate. Its output is a tree of three node
//! kinds; `{}` blocks arrive as a list headed by [`BLOCK`] whose arguments
//! are lists of statements, one list per parallel lane.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved head symbol for `{}` blocks
pub const BLOCK: &str = "block";

/// A parsed DSL node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Ast {
    /// A bare number
    Number(f64),
    /// A name, resolved through the registry
    Symbol(String),
    /// `head arg1 arg2 ...`
    List(Vec<Ast>),
}

impl Ast {
    /// Create a number node
    pub fn num(value: f64) -> Self {
        Ast::Number(value)
    }

    /// Create a symbol node
    pub fn sym(name: impl Into<String>) -> Self {
        Ast::Symbol(name.into())
    }

    /// Create a list node
    pub fn list(elements: impl IntoIterator<Item = Ast>) -> Self {
        Ast::List(elements.into_iter().collect())
    }

    /// Apply a named head to arguments: `(head args...)`
    pub fn apply(head: &str, args: impl IntoIterator<Item = Ast>) -> Self {
        let mut elements = vec![Ast::sym(head)];
        elements.extend(args);
        Ast::List(elements)
    }

    /// Build a block from lanes of statements
    ///
    /// Each lane runs its statements in order; lanes run in parallel.
    pub fn block(lanes: impl IntoIterator<Item = Vec<Ast>>) -> Self {
        let mut elements = vec![Ast::sym(BLOCK)];
        elements.extend(lanes.into_iter().map(Ast::List));
        Ast::List(elements)
    }

    /// Get the node kind name
    pub fn type_name(&self) -> &'static str {
        match self {
            Ast::Number(_) => "number",
            Ast::Symbol(_) => "symbol",
            Ast::List(_) => "list",
        }
    }

    /// Try to get the elements of a list node
    pub fn as_list(&self) -> Option<&[Ast]> {
        match self {
            Ast::List(elements) => Some(elements),
            _ => None,
        }
    }
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ast::Number(n) => write!(f, "{}", n),
            Ast::Symbol(s) => write!(f, "{}", s),
            Ast::List(elements) => {
                write!(f, "(")?;
                for (i, e) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", e)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<f64> for Ast {
    fn from(value: f64) -> Self {
        Ast::Number(value)
    }
}

impl From<i32> for Ast {
    fn from(value: i32) -> Self {
        Ast::Number(value as f64)
    }
}

impl From<&str> for Ast {
    fn from(name: &str) -> Self {
        Ast::Symbol(name.to_string())
    }
}
