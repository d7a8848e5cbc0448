//! Simulator facade
//!
//! Owns everything one show needs: the compiler, the active program, the
//! field, the RNG and the external collaborators.

use crate::ast::Ast;
use crate::compiler::Compiler;
use crate::config::SimConfig;
use crate::cue::{CuePlayer, Silent};
use crate::error::Result;
use crate::field::{Env, Field, TickStats};
use crate::gen::{BehaviorGen, Generate, Index};
use crate::glyph::{GridRasterizer, Rasterizer};
use crate::particle::{Particle, ParticleSnapshot};
use crate::rng::SimRng;
use glam::DVec3;
use log::{debug, warn};

/// Runs compiled programs on a particle field
pub struct Simulator<P = Silent, R = GridRasterizer> {
    compiler: Compiler,
    config: SimConfig,
    rng: SimRng,
    program: Option<BehaviorGen>,
    field: Field,
    cues: P,
    rasterizer: R,
    /// Total simulation time advanced so far
    elapsed: f64,
}

impl Simulator {
    /// Create a simulator that discards cues and uses the grid rasterizer
    pub fn new(config: SimConfig) -> Self {
        Self::with_collaborators(config, Silent, GridRasterizer::default())
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl<P: CuePlayer, R: Rasterizer> Simulator<P, R> {
    /// Create a simulator with explicit collaborators
    pub fn with_collaborators(config: SimConfig, cues: P, rasterizer: R) -> Self {
        Self {
            compiler: Compiler::new(),
            rng: SimRng::new(config.seed),
            config,
            program: None,
            field: Field::new(),
            cues,
            rasterizer,
            elapsed: 0.0,
        }
    }

    /// Replace the compiler, e.g. to use a custom registry
    pub fn with_compiler(mut self, compiler: Compiler) -> Self {
        self.compiler = compiler;
        self
    }

    /// Compile and activate a program
    ///
    /// On failure the previous program stays active.
    pub fn compile_program(&mut self, program: &[Ast]) -> Result<()> {
        match self.compiler.compile_program(program) {
            Ok(gen) => {
                self.program = Some(gen);
                Ok(())
            }
            Err(err) => {
                warn!("Rejected program, keeping the previous one: {}", err);
                Err(err)
            }
        }
    }

    /// Activate an already compiled program
    pub fn set_program(&mut self, program: BehaviorGen) {
        self.program = Some(program);
    }

    pub fn program(&self) -> Option<&BehaviorGen> {
        self.program.as_ref()
    }

    /// Spawn a particle at `(x, y, z)` running the active program
    ///
    /// Returns false when no program is active.
    pub fn emit_root_particle(&mut self, x: f64, y: f64, z: f64) -> bool {
        let Some(program) = &self.program else {
            return false;
        };
        let behavior = program.generate(Index::ROOT, &mut self.rng);
        let particle = Particle::at(DVec3::new(x, y, z), &self.config.physics);
        self.field.add(particle, behavior);
        debug!("Root particle emitted at ({}, {}, {})", x, y, z);
        true
    }

    /// Advance the field by `delta`
    pub fn update(&mut self, delta: f64) -> TickStats {
        let env = Env {
            rng: &mut self.rng,
            config: &self.config,
            cues: &mut self.cues,
            rasterizer: &self.rasterizer,
        };
        let stats = self.field.update(delta, env);
        if delta > 0.0 {
            self.elapsed += delta;
        }
        stats
    }

    /// Perform `steps_per_update` ticks of the configured step
    pub fn run_steps(&mut self) -> TickStats {
        let mut total = TickStats {
            live: self.field.len(),
            ..TickStats::default()
        };
        for _ in 0..self.config.steps_per_update {
            let stats = self.update(self.config.step);
            total.spawned += stats.spawned;
            total.removed += stats.removed;
            total.live = stats.live;
        }
        total
    }

    /// True when no particle is live or every live particle is closed
    pub fn closed(&self) -> bool {
        self.field.closed()
    }

    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.field.particles()
    }

    /// Copy the renderer-facing state of every live particle
    pub fn snapshot(&self) -> Vec<ParticleSnapshot> {
        self.field.snapshot()
    }

    /// Drop every live particle
    pub fn clear(&mut self) {
        self.field.clear();
    }

    pub fn len(&self) -> usize {
        self.field.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field.is_empty()
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    pub fn cues(&self) -> &P {
        &self.cues
    }

    pub fn cues_mut(&mut self) -> &mut P {
        &mut self.cues
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }
}
