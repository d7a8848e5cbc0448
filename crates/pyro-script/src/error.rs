//! Error types for pyro-script

use thiserror::Error;

/// Show loading error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("Duplicate definition: {0}")]
    DuplicateDefinition(String),

    #[error("Unknown program: {0}")]
    UnknownProgram(String),

    #[error("Program {program} failed to compile: {source}")]
    Compile {
        program: String,
        #[source]
        source: pyro_core::Error,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
