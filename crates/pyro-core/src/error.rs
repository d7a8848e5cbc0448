//! Error types for pyro-core
//!
//! Every error here is raised while compiling. The runtime has no error
//! taxonomy: numerical edge cases are defended where they occur.

use thiserror::Error;

/// Compile error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{unit} takes {expected} arguments but got {got}")]
    ArityMismatch {
        unit: String,
        expected: String,
        got: usize,
    },

    #[error("Type error: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("{0} takes no arguments")]
    NoArgumentsAllowed(String),
}

impl Error {
    pub(crate) fn arity(unit: impl Into<String>, expected: impl ToString, got: usize) -> Self {
        Error::ArityMismatch {
            unit: unit.into(),
            expected: expected.to_string(),
            got,
        }
    }

    pub(crate) fn mismatch(expected: &str, got: impl Into<String>) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            got: got.into(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = Error::arity("translate", 3, 2);
        assert_eq!(err.to_string(), "translate takes 3 arguments but got 2");

        let err = Error::mismatch("number", "nop");
        assert_eq!(err.to_string(), "Type error: expected number, got nop");

        let err = Error::NoArgumentsAllowed("each-angle".into());
        assert_eq!(err.to_string(), "each-angle takes no arguments");
    }
}
