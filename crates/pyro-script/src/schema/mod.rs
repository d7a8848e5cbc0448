//! Schema definitions for RON show files

pub mod launch;
pub mod program;
pub mod show;

pub use launch::LaunchDef;
pub use program::ProgramDef;
pub use show::ShowDef;
