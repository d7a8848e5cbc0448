//! Launch schedule schema

use serde::{Deserialize, Serialize};

/// A root particle fired at a given tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchDef {
    /// Program the root particle runs
    pub program: String,
    /// Launch position
    #[serde(default)]
    pub at: (f64, f64, f64),
    /// Tick on which the particle is emitted
    #[serde(default)]
    pub tick: u64,
}

impl LaunchDef {
    /// Launch `program` from the origin on tick 0
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            at: (0.0, 0.0, 0.0),
            tick: 0,
        }
    }

    /// Set the launch position
    pub fn at(mut self, x: f64, y: f64, z: f64) -> Self {
        self.at = (x, y, z);
        self
    }

    /// Set the launch tick
    pub fn on_tick(mut self, tick: u64) -> Self {
        self.tick = tick;
        self
    }
}
