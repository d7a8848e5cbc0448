//! Test fixture driving a single behavior on a single particle

use crate::behavior::{Behavior, Status};
use crate::config::SimConfig;
use crate::cue::CueLog;
use crate::field::{Env, Slot, Stage};
use crate::glyph::GridRasterizer;
use crate::particle::Particle;
use crate::rng::SimRng;
use glam::DVec3;

pub(crate) struct Harness {
    pub(crate) config: SimConfig,
    pub(crate) rng: SimRng,
    pub(crate) cues: CueLog,
    pub(crate) raster: GridRasterizer,
    pub(crate) particle: Particle,
    /// Everything spawned so far, in order
    pub(crate) spawned: Vec<Slot>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        let config = SimConfig::default();
        let particle = Particle::at(DVec3::ZERO, &config.physics);
        Self {
            rng: SimRng::new(config.seed),
            config,
            cues: CueLog::new(),
            raster: GridRasterizer::default(),
            particle,
            spawned: Vec::new(),
        }
    }

    pub(crate) fn step(&mut self, behavior: &mut Behavior, start: f64, end: f64) -> Status {
        let env = Env {
            rng: &mut self.rng,
            config: &self.config,
            cues: &mut self.cues,
            rasterizer: &self.raster,
        };
        let mut stage = Stage::new(env);
        let status = behavior.update(&mut stage, &mut self.particle, start, end);
        self.spawned.extend(stage.into_spawned());
        status
    }
}
