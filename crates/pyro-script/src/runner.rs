//! Plays a loaded show tick by tick

use crate::error::{Error, Result};
use crate::loader::Show;
use crate::schema::LaunchDef;
use indexmap::IndexMap;
use log::{debug, info};
use pyro_core::{
    BehaviorGen, CuePlayer, GridRasterizer, Rasterizer, Silent, Simulator, TickStats,
};

/// Drives a [`Simulator`] through a show's launch schedule
pub struct ShowRunner<P = Silent, R = GridRasterizer> {
    sim: Simulator<P, R>,
    programs: IndexMap<String, BehaviorGen>,
    /// Sorted by tick; ties keep file order
    launches: Vec<LaunchDef>,
    next: usize,
    tick: u64,
}

impl ShowRunner {
    /// Compile a show for a simulator built from its config
    pub fn new(show: &Show) -> Result<Self> {
        Self::with_simulator(show, Simulator::new(show.config.clone()))
    }
}

impl<P: CuePlayer, R: Rasterizer> ShowRunner<P, R> {
    /// Compile a show for an existing simulator
    ///
    /// Every program is compiled up front and every launch must name one.
    pub fn with_simulator(show: &Show, sim: Simulator<P, R>) -> Result<Self> {
        let programs = show.compile_all(sim.compiler())?;

        let mut launches = show.launches.clone();
        if let Some(launch) = launches.iter().find(|l| !programs.contains_key(&l.program)) {
            return Err(Error::UnknownProgram(launch.program.clone()));
        }
        launches.sort_by_key(|l| l.tick);

        info!(
            "Show {:?} ready: {} programs, {} launches",
            show.name,
            programs.len(),
            launches.len()
        );
        Ok(Self {
            sim,
            programs,
            launches,
            next: 0,
            tick: 0,
        })
    }

    /// Fire due launches, then run one simulator update
    pub fn step(&mut self) -> TickStats {
        while let Some(launch) = self.launches.get(self.next) {
            if launch.tick > self.tick {
                break;
            }
            if let Some(program) = self.programs.get(&launch.program) {
                let (x, y, z) = launch.at;
                self.sim.set_program(program.clone());
                self.sim.emit_root_particle(x, y, z);
                debug!("Tick {}: launched {}", self.tick, launch.program);
            }
            self.next += 1;
        }

        self.tick += 1;
        self.sim.run_steps()
    }

    /// True once every launch has fired and the field is empty
    pub fn finished(&self) -> bool {
        self.next >= self.launches.len() && self.sim.is_empty()
    }

    /// Step until finished or `max_ticks` steps have run; returns the steps taken
    pub fn run(&mut self, max_ticks: u64) -> u64 {
        let mut steps = 0;
        while steps < max_ticks && !self.finished() {
            self.step();
            steps += 1;
        }
        steps
    }

    /// Steps taken so far
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn simulator(&self) -> &Simulator<P, R> {
        &self.sim
    }

    pub fn simulator_mut(&mut self) -> &mut Simulator<P, R> {
        &mut self.sim
    }

    /// Stop driving and hand back the simulator
    pub fn into_simulator(self) -> Simulator<P, R> {
        self.sim
    }
}
