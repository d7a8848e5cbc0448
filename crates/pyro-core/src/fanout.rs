//! Behaviors that spawn particles
//!
//! Spawned children never share behavior state: each one receives a fresh
//! instance built from the template generator.

use crate::cue::Cue;
use crate::easing::Easing;
use crate::field::Stage;
use crate::gen::{BehaviorGen, Generate, Index, MAX_SPAWN};
use crate::particle::Particle;
use glam::DVec3;
use log::warn;
use std::f64::consts::PI;
use std::rc::Rc;

/// Slots on the Fibonacci sphere used by flair
const FLAIR_SIZE: usize = 300;

/// Emits groups of children as the eased ratio crosses group boundaries
#[derive(Debug, Clone)]
pub(crate) struct Emit {
    /// One entry per group (time step); each lists the slot indices it spawns
    groups: Vec<Vec<usize>>,
    total: usize,
    body: Rc<BehaviorGen>,
}

impl Emit {
    /// Build the slot table
    ///
    /// The table never exceeds [`MAX_SPAWN`] slots: `times` is kept, then
    /// `parallel` and `count` shrink until the product fits.
    pub(crate) fn new(count: usize, times: usize, parallel: usize, body: Rc<BehaviorGen>) -> Self {
        let times = times.min(MAX_SPAWN);
        let parallel = parallel.min(MAX_SPAWN / times.max(1));
        let capped = count.min(MAX_SPAWN / times.saturating_mul(parallel).max(1));
        if capped < count {
            warn!("Emit of {} x {} x {} capped to {} per group", count, times, parallel, capped);
        }
        let count = capped;

        let groups = (0..times)
            .map(|t| {
                (0..count)
                    .flat_map(|n| (0..parallel).map(move |p| n + count * t + times * count * p))
                    .collect()
            })
            .collect();
        Self {
            groups,
            total: count * times * parallel,
            body,
        }
    }

    /// Fire every group whose 1-based rank lies in `(ranks(start), ranks(end)]`
    pub(crate) fn update(
        &self,
        stage: &mut Stage<'_>,
        particle: &Particle,
        easing: Easing,
        lifespan: f64,
        start: f64,
        end: f64,
    ) {
        let groups = self.groups.len();
        let from = easing.at(start, lifespan) * groups as f64;
        let to = easing.at(end, lifespan) * groups as f64;
        let first = from.floor() as usize + 1;
        let last = (to.floor() as usize).min(groups);

        for rank in first..=last {
            for &slot in &self.groups[rank - 1] {
                let behavior = self.body.generate(Index::new(slot, self.total), stage.rng());
                stage.add(particle.spawn_child(), behavior);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }
}

/// Effects fired once per run
#[derive(Debug, Clone)]
pub(crate) enum Fanout {
    Flair {
        count: usize,
        body: Rc<BehaviorGen>,
    },
    Fireworks {
        count: usize,
        body: Rc<BehaviorGen>,
    },
    Character {
        text: String,
        body: Rc<BehaviorGen>,
    },
    Text {
        text: String,
        offset: DVec3,
        body: Rc<BehaviorGen>,
    },
    Voice(Cue),
}

#[derive(Debug, Clone)]
pub(crate) struct OneShot {
    fanout: Fanout,
    fired: bool,
}

impl OneShot {
    pub(crate) fn new(fanout: Fanout) -> Self {
        Self {
            fanout,
            fired: false,
        }
    }

    pub(crate) fn update(&mut self, stage: &mut Stage<'_>, particle: &Particle, start: f64) {
        if start == 0.0 {
            self.fired = false;
        }
        if !self.fired {
            self.fired = true;
            self.fanout.fire(stage, particle);
        }
    }
}

impl Fanout {
    fn fire(&self, stage: &mut Stage<'_>, particle: &Particle) {
        match self {
            Fanout::Flair { count, body } => flair(stage, particle, *count, body),
            Fanout::Fireworks { count, body } => fireworks(stage, particle, *count, body),
            Fanout::Character { text, body } => glyphs(stage, particle, text, DVec3::ZERO, body),
            Fanout::Text { text, offset, body } => glyphs(stage, particle, text, *offset, body),
            Fanout::Voice(cue) => stage.play(*cue),
        }
    }
}

/// Children leave along a Fibonacci sphere with shared speed and gravity
fn flair(stage: &mut Stage<'_>, particle: &Particle, count: usize, body: &BehaviorGen) {
    let offset = 2.0 / FLAIR_SIZE as f64;
    let inc = PI * (3.0 - 5f64.sqrt());
    let speed = stage.rng().range_f64(2.0, 4.0);
    let gravity = -0.1 - stage.rng().next_f64() * 2.0;
    let mass = stage.physics().spawn_mass;

    for i in 0..count.min(MAX_SPAWN) {
        let vy = (i as f64 * offset - 1.0 + offset / 2.0).abs();
        let r = (1.0 - vy * vy).max(0.0).sqrt();
        let phi = ((i + 1) % FLAIR_SIZE) as f64 * inc;
        let velocity = DVec3::new(phi.cos() * r, vy, phi.sin() * r) * speed;

        let child = particle.launch(particle.position, velocity, gravity, mass);
        let behavior = body.generate(Index::ROOT, stage.rng());
        stage.add(child, behavior);
    }
}

/// Children leave in independently random directions
fn fireworks(stage: &mut Stage<'_>, particle: &Particle, count: usize, body: &BehaviorGen) {
    let gravity = stage.physics().default_gravity;
    let mass = stage.physics().spawn_mass;

    for _ in 0..count.min(MAX_SPAWN) {
        let rng = stage.rng();
        let vy = 1.0 - rng.next_f64() * 2.0;
        let vx = 1.0 - rng.next_f64() * 2.0;
        let vz = 1.0 - rng.next_f64() * 2.0;

        let child = particle.launch(particle.position, DVec3::new(vx, vy, vz), gravity, mass);
        let behavior = body.generate(Index::ROOT, stage.rng());
        stage.add(child, behavior);
    }
}

/// One child per rasterized point, centered on the particle plus `offset`
fn glyphs(stage: &mut Stage<'_>, particle: &Particle, text: &str, offset: DVec3, body: &BehaviorGen) {
    let cloud = stage.rasterize(text);
    let translation = particle.position - cloud.centroid + offset;
    let gravity = stage.physics().default_gravity;
    let mass = stage.physics().spawn_mass;

    for point in &cloud.points {
        let rng = stage.rng();
        let vy = 1.0 - rng.next_f64() * 2.0;
        let vx = rng.next_f64();
        let vz = 1.0 - rng.next_f64() * 2.0;

        let child = particle.launch(*point + translation, DVec3::new(vx, vy, vz), gravity, mass);
        let behavior = body.generate(Index::ROOT, stage.rng());
        stage.add(child, behavior);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::Behavior;
    use crate::cue::Cue;
    use crate::gen::{Choice, NumberGen, Selection};
    use crate::glyph::GridRasterizer;
    use crate::testing::Harness;

    fn tagged_body() -> Rc<BehaviorGen> {
        // Tags each child with its slot index through the lifespan
        Rc::new(BehaviorGen::Lifespan {
            lifespan: NumberGen::Range {
                selection: Selection::Each,
                min: Box::new(NumberGen::Const(0.0)),
                max: Box::new(NumberGen::Const(1.0)),
            },
            body: Box::new(BehaviorGen::Nop),
        })
    }

    #[test]
    fn test_emit_index_table() {
        let emit = Emit::new(2, 3, 2, Rc::new(BehaviorGen::Nop));
        assert_eq!(emit.groups().len(), 3);
        assert_eq!(emit.groups()[0], vec![0, 6, 1, 7]);
        assert_eq!(emit.groups()[2], vec![4, 10, 5, 11]);
        assert_eq!(emit.total, 12);
    }

    #[test]
    fn test_emit_table_is_capped() {
        let emit = Emit::new(MAX_SPAWN, MAX_SPAWN, MAX_SPAWN, Rc::new(BehaviorGen::Nop));
        assert_eq!(emit.total, MAX_SPAWN);
        assert_eq!(emit.groups().len(), MAX_SPAWN);

        let emit = Emit::new(usize::MAX, 2, 3, Rc::new(BehaviorGen::Nop));
        assert_eq!(emit.total, MAX_SPAWN / 6 * 6);
        assert!(emit.groups().iter().all(|g| g.len() == MAX_SPAWN / 6 * 3));
    }

    #[test]
    fn test_emit_spawns_each_slot_once() {
        let mut h = Harness::new();
        let body = Rc::new(BehaviorGen::Lifespan {
            lifespan: NumberGen::Choice(Choice::new(
                Selection::Each,
                vec![NumberGen::Const(1.0), NumberGen::Const(2.0)],
            )),
            body: Box::new(BehaviorGen::Nop),
        });
        let mut b = Behavior::emit(2, 1, 1, body).with_lifespan(10.0);

        let mut t = 0.0;
        while t < 20.0 {
            h.step(&mut b, t, t + 1.0);
            t += 1.0;
        }
        let mut lifespans: Vec<f64> = h.spawned.iter().map(|s| s.behavior.lifespan()).collect();
        lifespans.sort_by(f64::total_cmp);
        assert_eq!(lifespans, vec![1.0, 2.0]);
    }

    #[test]
    fn test_emit_groups_follow_easing() {
        let mut h = Harness::new();
        let mut b = Behavior::emit(1, 4, 1, tagged_body()).with_lifespan(4.0);
        for tick in 0..4 {
            h.step(&mut b, tick as f64, tick as f64 + 1.0);
            assert_eq!(h.spawned.len(), tick + 1);
        }
        let lifespans: Vec<f64> = h.spawned.iter().map(|s| s.behavior.lifespan()).collect();
        assert_eq!(lifespans, vec![0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0]);
    }

    #[test]
    fn test_emit_big_window_fires_all() {
        let mut h = Harness::new();
        let mut b = Behavior::emit(3, 5, 1, Rc::new(BehaviorGen::Nop)).with_lifespan(2.0);
        assert!(h.step(&mut b, 0.0, 100.0).is_done());
        assert_eq!(h.spawned.len(), 15);
    }

    #[test]
    fn test_emit_zero_lifespan_fires_on_first_call() {
        let mut h = Harness::new();
        let mut b = Behavior::emit(2, 2, 1, Rc::new(BehaviorGen::Nop));
        h.step(&mut b, 0.0, 1.0);
        assert_eq!(h.spawned.len(), 4);
    }

    #[test]
    fn test_children_clone_parent() {
        let mut h = Harness::new();
        h.particle.position = DVec3::new(1.0, 2.0, 3.0);
        h.particle.hue = 200.0;
        let mut b = Behavior::emit(1, 1, 1, Rc::new(BehaviorGen::Nop));
        h.step(&mut b, 0.0, 1.0);
        let child = &h.spawned[0].particle;
        assert_eq!(child.position, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(child.hue, 200.0);
        assert_eq!(child.life_time, 0.0);
    }

    #[test]
    fn test_flair_fires_once_per_run() {
        let mut h = Harness::new();
        let mut b = Behavior::flair(30, Rc::new(BehaviorGen::Nop)).with_lifespan(3.0);
        h.step(&mut b, 0.0, 1.0);
        h.step(&mut b, 1.0, 2.0);
        h.step(&mut b, 2.0, 3.0);
        assert_eq!(h.spawned.len(), 30);

        let gravity = h.spawned[0].particle.gravity;
        for slot in &h.spawned {
            let p = &slot.particle;
            assert_eq!(p.gravity, gravity);
            assert_eq!(p.mass, h.config.physics.spawn_mass);
            assert!(p.velocity.y >= 0.0);
            let speed = p.velocity.length();
            assert!(speed > 2.0 - 1e-9 && speed < 4.0 + 1e-9, "speed {}", speed);
        }
        assert!((-2.1..=-0.1).contains(&gravity));

        h.step(&mut b, 0.0, 1.0);
        assert_eq!(h.spawned.len(), 60);
    }

    #[test]
    fn test_fireworks_random_directions() {
        let mut h = Harness::new();
        let mut b = Behavior::fireworks(50, Rc::new(BehaviorGen::Nop));
        h.step(&mut b, 0.0, 1.0);
        assert_eq!(h.spawned.len(), 50);
        for slot in &h.spawned {
            let v = slot.particle.velocity;
            assert!(v.x > -1.0 && v.x <= 1.0);
            assert!(v.y > -1.0 && v.y <= 1.0);
            assert!(v.z > -1.0 && v.z <= 1.0);
        }
    }

    #[test]
    fn test_text_centers_on_particle() {
        let mut h = Harness::new();
        h.particle.position = DVec3::new(10.0, 0.0, 0.0);
        let offset = DVec3::new(0.0, 100.0, 0.0);
        let mut b = Behavior::text("hi".into(), offset, Rc::new(BehaviorGen::Nop));
        h.step(&mut b, 0.0, 1.0);

        assert_eq!(h.spawned.len(), 2 * GridRasterizer::points_per_glyph());
        let centroid = h
            .spawned
            .iter()
            .map(|s| s.particle.position)
            .sum::<DVec3>()
            / h.spawned.len() as f64;
        assert!((centroid - DVec3::new(10.0, 100.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_character_without_points_spawns_nothing() {
        let mut h = Harness::new();
        let mut b = Behavior::character(" ".into(), Rc::new(BehaviorGen::Nop));
        assert!(h.step(&mut b, 0.0, 1.0).is_done());
        assert!(h.spawned.is_empty());
    }

    #[test]
    fn test_voice_signals_without_touching_particle() {
        let mut h = Harness::new();
        let before = h.particle.clone();
        let mut b = Behavior::cue(Cue::Bloom);
        h.step(&mut b, 0.0, 1.0);
        assert_eq!(h.cues.cues(), &[Cue::Bloom]);
        assert_eq!(h.particle, before);
    }
}
