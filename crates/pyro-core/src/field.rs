//! The set of live particles and the per-tick driver
//!
//! Each particle is stored next to its root behavior in a [`Slot`], so a
//! tick can hand the behavior a mutable borrow of its own particle.
//! Spawns land in the [`Stage`] and join the field after the loop, which
//! guarantees a new particle is first visited on the following tick.

use crate::behavior::Behavior;
use crate::config::{PhysicsConfig, SimConfig};
use crate::cue::{Cue, CuePlayer};
use crate::glyph::{PointCloud, Rasterizer};
use crate::particle::{Particle, ParticleSnapshot};
use crate::rng::SimRng;
use glam::DVec3;
use log::{debug, trace};

/// Collaborators borrowed for the duration of one tick
pub struct Env<'a> {
    pub rng: &'a mut SimRng,
    pub config: &'a SimConfig,
    pub cues: &'a mut dyn CuePlayer,
    pub rasterizer: &'a dyn Rasterizer,
}

/// Tick context handed to every behavior
pub struct Stage<'a> {
    env: Env<'a>,
    spawned: Vec<Slot>,
}

impl<'a> Stage<'a> {
    pub fn new(env: Env<'a>) -> Self {
        Self {
            env,
            spawned: Vec::new(),
        }
    }

    /// Queue a new particle; it joins the field after the current tick
    pub fn add(&mut self, particle: Particle, behavior: Behavior) {
        self.spawned.push(Slot { particle, behavior });
    }

    pub fn rng(&mut self) -> &mut SimRng {
        self.env.rng
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.env.config.physics
    }

    /// Bound on child completions a composite may chain in one call
    pub fn continuation_limit(&self) -> u32 {
        self.env.config.continuation_limit.max(1)
    }

    /// Signal an audio cue
    pub fn play(&mut self, cue: Cue) {
        debug!("Cue {} fired at volume {}", cue.name(), cue.volume());
        self.env.cues.play(cue);
    }

    pub fn rasterize(&self, text: &str) -> PointCloud {
        self.env.rasterizer.rasterize(text)
    }

    pub fn into_spawned(self) -> Vec<Slot> {
        self.spawned
    }
}

/// A particle and the behavior driving it
#[derive(Debug, Clone)]
pub struct Slot {
    pub particle: Particle,
    pub behavior: Behavior,
}

/// Counts reported by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickStats {
    /// Particles added by behaviors during the tick
    pub spawned: usize,
    /// Particles whose root behavior completed
    pub removed: usize,
    /// Particles alive after the tick
    pub live: usize,
}

/// Live particles
#[derive(Debug, Clone, Default)]
pub struct Field {
    slots: Vec<Slot>,
}

impl Field {
    /// Create an empty field
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a particle driven by `behavior`
    pub fn add(&mut self, particle: Particle, behavior: Behavior) {
        self.slots.push(Slot { particle, behavior });
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drop every particle
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// True when empty or when every live particle is closed
    pub fn closed(&self) -> bool {
        self.slots.iter().all(|slot| slot.particle.closed)
    }

    /// Iterate over live particles
    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.slots.iter().map(|slot| &slot.particle)
    }

    /// Copy the renderer-facing state of every live particle
    pub fn snapshot(&self) -> Vec<ParticleSnapshot> {
        self.particles().map(Particle::snapshot).collect()
    }

    /// Advance every live particle by `dt`
    ///
    /// Completed particles are removed by swapping in the last slot. Every
    /// visited particle also drifts `speed * dt` along its local z axis,
    /// whether or not it completed. A non-positive `dt` does nothing.
    pub fn update(&mut self, dt: f64, env: Env<'_>) -> TickStats {
        if !(dt > 0.0) {
            return TickStats {
                live: self.slots.len(),
                ..TickStats::default()
            };
        }

        let mut stage = Stage::new(env);
        let mut removed = 0;
        let mut i = 0;
        while i < self.slots.len() {
            let Slot { particle, behavior } = &mut self.slots[i];
            let start = particle.life_time;
            let end = start + dt;
            particle.life_time = end;
            let status = behavior.update(&mut stage, particle, start, end);
            particle.translate(DVec3::new(0.0, 0.0, particle.speed * dt));

            if status.is_done() {
                self.slots.swap_remove(i);
                removed += 1;
            } else {
                i += 1;
            }
        }

        let spawned = stage.into_spawned();
        let stats = TickStats {
            spawned: spawned.len(),
            removed,
            live: self.slots.len() + spawned.len(),
        };
        self.slots.extend(spawned);

        trace!(
            "Tick dt={}: {} live, {} spawned, {} removed",
            dt,
            stats.live,
            stats.spawned,
            stats.removed
        );
        stats
    }
}
