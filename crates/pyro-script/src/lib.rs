//! Pyro Script - RON show loader and runner
//!
//! Loads shows from RON files:
//! - Simulator configuration
//! - Named programs, stored as the DSL parser's syntax tree
//! - A launch schedule of root particles
//!
//! Compiled programs are never written back; a show is recompiled from
//! its syntax tree every time it is loaded.

mod error;
mod loader;
mod runner;
mod schema;

pub use error::{Error, Result};
pub use loader::{Loader, Show};
pub use runner::ShowRunner;
pub use schema::{LaunchDef, ProgramDef, ShowDef};
