//! Show file schema

use super::{LaunchDef, ProgramDef};
use pyro_core::SimConfig;
use serde::{Deserialize, Serialize};

/// Top-level contents of a show file
///
/// Every section is optional, so a show can be split across files: one
/// holding the configuration, others holding programs or launches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShowDef {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Simulator configuration; unset fields keep their defaults
    #[serde(default)]
    pub config: Option<SimConfig>,
    /// Program definitions
    #[serde(default)]
    pub programs: Vec<ProgramDef>,
    /// Launch schedule
    #[serde(default)]
    pub launches: Vec<LaunchDef>,
}
