//! Program definition schema

use pyro_core::Ast;
use serde::{Deserialize, Serialize};

/// A named program, stored as the parser's syntax tree
///
/// ```ron
/// (
///     id: "fade",
///     statements: [
///         List([Number(60), Symbol("opacity"), Number(0)]),
///     ],
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramDef {
    /// Unique identifier for this program
    pub id: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Top-level statements, run in order
    pub statements: Vec<Ast>,
}

impl ProgramDef {
    /// Create a new program definition
    pub fn new(id: impl Into<String>, statements: Vec<Ast>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            statements,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
