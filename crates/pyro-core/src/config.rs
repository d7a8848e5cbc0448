//! Simulation configuration
//!
//! Every knob the runtime reads lives here and travels with the tick
//! context, so behaviors never consult process-wide state.

use serde::{Deserialize, Serialize};

/// Constants for the explode integrator and for freshly spawned particles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fixed integrator sub-step, independent of the tick size
    pub dt: f64,
    /// Scale applied to displacement so motion reads well on screen
    pub scale: f64,
    /// Drag constant `k` in `F = k * v^3 / |v|`
    ///
    /// The sign is part of the constant: a negative `k` opposes motion, so
    /// the default is the magnitude `0.0000900238` stored as a negative.
    pub drag: f64,
    /// Vertical acceleration for root and cloned particles
    pub default_gravity: f64,
    /// Mass for root particles
    pub default_mass: f64,
    /// Mass for particles launched by fan-out behaviors
    pub spawn_mass: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            dt: 0.0167,
            scale: 10.0,
            drag: -0.000_090_023_8,
            default_gravity: -0.2,
            default_mass: 0.001,
            spawn_mass: 0.01,
        }
    }
}

/// Configuration for a simulator
///
/// # Example
///
/// ```
/// use pyro_core::SimConfig;
///
/// let config = SimConfig::default().with_seed(7).with_step(0.5);
/// assert_eq!(config.seed, 7);
/// assert_eq!(config.step, 0.5);
/// assert_eq!(config.continuation_limit, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for randomized operators and fan-out jitter
    pub seed: u64,
    /// Simulation time advanced by one tick
    pub step: f64,
    /// Ticks performed by one `run_steps` call
    pub steps_per_update: u32,
    /// Bound on child completions a composite chains within one call
    pub continuation_limit: u32,
    /// Integrator constants
    pub physics: PhysicsConfig,
}

impl SimConfig {
    /// Set the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the tick size
    ///
    /// Non-positive or non-finite values fall back to the default.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = if step > 0.0 && step.is_finite() {
            step
        } else {
            Self::default().step
        };
        self
    }

    /// Set the number of ticks per `run_steps` call (at least 1)
    pub fn with_steps_per_update(mut self, steps: u32) -> Self {
        self.steps_per_update = steps.max(1);
        self
    }

    /// Set the continuation bound (at least 1)
    pub fn with_continuation_limit(mut self, limit: u32) -> Self {
        self.continuation_limit = limit.max(1);
        self
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            step: 1.0,
            steps_per_update: 1,
            continuation_limit: 100,
            physics: PhysicsConfig::default(),
        }
    }
}
