//! Pyro Core - compiler and runtime for a firework animation language
//!
//! This crate turns parsed DSL programs into particle shows:
//! - Syntax tree input (`Ast`) as produced by an external parser
//! - Name registry and two-phase unit resolution (`Registry`, `Compiler`)
//! - Index-parametrized generators (`BehaviorGen`, `NumberGen`, ...)
//! - Per-particle behavior trees with exact suspend/resume (`Behavior`)
//! - The live particle set and its tick driver (`Field`)
//! - A facade bundling all of the above (`Simulator`)
//!
//! ## Example
//!
//! ```
//! use pyro_core::{Ast, SimConfig, Simulator};
//!
//! let mut sim = Simulator::new(SimConfig::default());
//! // 30 ease-out speed 0
//! let program = [Ast::list([
//!     Ast::num(30.0),
//!     Ast::sym("ease-out"),
//!     Ast::sym("speed"),
//!     Ast::num(0.0),
//! ])];
//! sim.compile_program(&program).unwrap();
//! sim.emit_root_particle(0.0, 0.0, 0.0);
//!
//! while !sim.is_empty() {
//!     sim.run_steps();
//! }
//! assert_eq!(sim.elapsed(), 30.0);
//! ```
//!
//! ## Collaborators
//!
//! Audio and text rendering stay outside the core. Implement [`CuePlayer`]
//! to receive cue signals and [`Rasterizer`] to turn text into points.

pub mod ast;
pub mod behavior;
mod compiler;
mod composite;
pub mod config;
mod cue;
mod easing;
mod error;
mod fanout;
pub mod field;
pub mod gen;
mod glyph;
mod particle;
pub mod registry;
mod rng;
mod simulator;

#[cfg(test)]
mod testing;

pub use ast::{Ast, BLOCK};
pub use behavior::{Behavior, Status};
pub use compiler::Compiler;
pub use config::{PhysicsConfig, SimConfig};
pub use cue::{Cue, CueLog, CuePlayer, Silent};
pub use easing::Easing;
pub use error::{Error, Result};
pub use field::{Env, Field, Slot, Stage, TickStats};
pub use gen::{
    BehaviorGen, Choice, EasingGen, Generate, Index, NumberGen, ScalarOp, Selection, StringGen,
    Vec3Gen, MAX_SPAWN,
};
pub use glyph::{GridRasterizer, PointCloud, Rasterizer};
pub use particle::{Particle, ParticleSnapshot, Scalar};
pub use registry::{Action, Builtin, Constructor, Registry};
pub use rng::SimRng;
pub use simulator::Simulator;
