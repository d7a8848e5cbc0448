//! Finale Example
//!
//! Loads a show, plays it until every particle is gone and reports what
//! happened along the way.
//!
//! Usage: `finale [show.ron]` (defaults to the bundled show). Set
//! `RUST_LOG=debug` to see launches and cues as they fire.

use log::{info, warn};
use pyro_core::{Cue, CuePlayer, GridRasterizer, Simulator};
use pyro_script::{Loader, ShowRunner};
use std::collections::BTreeMap;

const BUNDLED_SHOW: &str = include_str!("../shows/finale.ron");
const MAX_TICKS: u64 = 10_000;

/// Counts cues instead of playing them
#[derive(Default)]
struct CueCounter {
    counts: BTreeMap<&'static str, usize>,
}

impl CuePlayer for CueCounter {
    fn play(&mut self, cue: Cue) {
        *self.counts.entry(cue.name()).or_default() += 1;
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut loader = Loader::new();
    match std::env::args().nth(1) {
        Some(path) => loader.load_file(&path)?,
        None => loader.load_str(BUNDLED_SHOW)?,
    }
    let show = loader.finish();

    println!("=== Pyro Finale ===\n");
    println!("Show: {}", show.name);
    for program in show.programs.values() {
        println!("  {:<10} {}", program.id, program.description);
    }
    println!();

    let sim = Simulator::with_collaborators(
        show.config.clone(),
        CueCounter::default(),
        GridRasterizer::default(),
    );
    let mut runner = ShowRunner::with_simulator(&show, sim)?;

    let mut peak = 0;
    let mut spawned = 0;
    while !runner.finished() && runner.tick() < MAX_TICKS {
        let stats = runner.step();
        spawned += stats.spawned;
        peak = peak.max(stats.live);

        if runner.tick() % 20 == 0 {
            let sim = runner.simulator();
            let lit = sim.particles().filter(|p| !p.closed).count();
            info!(
                "t={:>6.1}  live={:>4}  lit={:>4}  spawned={:>3}  removed={:>3}",
                sim.elapsed(),
                stats.live,
                lit,
                stats.spawned,
                stats.removed
            );
        }
    }

    if !runner.finished() {
        warn!("Stopped after {} ticks with particles still live", MAX_TICKS);
    }

    let sim = runner.into_simulator();
    println!("Finished after {} time units", sim.elapsed());
    println!("  particles spawned: {}", spawned);
    println!("  peak live: {}", peak);
    for (cue, count) in &sim.cues().counts {
        println!("  {}: {}", cue, count);
    }

    Ok(())
}
