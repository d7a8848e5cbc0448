//! Per-particle behavior trees
//!
//! A [`Behavior`] is a stateful step function over a time window. Every
//! variant follows one contract:
//!
//! - `update(stage, particle, start, end)` is called with `0 <= start < end`.
//!   The first call of a run passes `start == 0`, which (re)initializes the
//!   node; later calls continue from the previous `end`.
//! - The callee may spawn particles through the [`Stage`] but never removes
//!   any.
//! - [`Status::Running`] means the node wants more time.
//!   [`Status::Done`] carries the part of the window it did not use, so a
//!   parent can start the next child at `end - leftover` within the same call.
//!
//! A leaf completes once its lifespan has elapsed:
//! `leftover = end - max(lifespan, start)`.

use crate::composite::{Chain, Lanes};
use crate::cue::Cue;
use crate::easing::Easing;
use crate::fanout::{Emit, Fanout, OneShot};
use crate::field::Stage;
use crate::gen::BehaviorGen;
use crate::particle::{Particle, Scalar};
use glam::DVec3;
use std::rc::Rc;

/// Outcome of one `update` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Status {
    /// Still running at the end of the window
    Running,
    /// Finished at `end - leftover`
    Done { leftover: f64 },
}

impl Status {
    /// Interpret a raw leftover time
    ///
    /// Zero (of either sign) and positive values complete; negative values,
    /// `-inf` and NaN keep running. Leftover is never negative.
    pub fn from_leftover(leftover: f64) -> Self {
        if leftover >= 0.0 {
            Status::Done {
                leftover: leftover.max(0.0),
            }
        } else {
            Status::Running
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Status::Done { .. })
    }

    pub fn leftover(&self) -> Option<f64> {
        match self {
            Status::Done { leftover } => Some(*leftover),
            Status::Running => None,
        }
    }
}

/// One-shot effect fired by a switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    /// Mark the particle closed
    Close,
}

impl Switch {
    fn apply(self, particle: &mut Particle) {
        match self {
            Switch::Close => particle.closed = true,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Kind {
    Nop,
    Set {
        target: Scalar,
        value: f64,
        /// Captured on the first call of a run
        initial: Option<f64>,
    },
    Add {
        target: Scalar,
        value: f64,
    },
    Multiply {
        target: Scalar,
        scale: f64,
    },
    Switch {
        effect: Switch,
        fired: bool,
    },
    Translate(DVec3),
    Rotate(DVec3),
    Explode,
    Emit(Emit),
    OneShot(OneShot),
    Chain(Chain),
    Parallel(Lanes),
}

/// A runtime behavior node, owned by exactly one particle
#[derive(Debug, Clone)]
pub struct Behavior {
    easing: Easing,
    lifespan: f64,
    kind: Kind,
}

impl Behavior {
    fn leaf(kind: Kind) -> Self {
        Self {
            easing: Easing::Linear,
            lifespan: 0.0,
            kind,
        }
    }

    /// Does nothing for its lifespan
    pub fn nop() -> Self {
        Self::leaf(Kind::Nop)
    }

    /// Marks the particle closed once the eased ratio reaches 1
    pub fn close() -> Self {
        Self::leaf(Kind::Switch {
            effect: Switch::Close,
            fired: false,
        })
    }

    /// One physics sub-step per call
    pub fn explode() -> Self {
        Self::leaf(Kind::Explode)
    }

    /// Eases a scalar from its value at start to `value`
    pub fn set(target: Scalar, value: f64) -> Self {
        Self::leaf(Kind::Set {
            target,
            value,
            initial: None,
        })
    }

    /// Adds `value` to a scalar, spread along the easing curve
    pub fn add(target: Scalar, value: f64) -> Self {
        Self::leaf(Kind::Add { target, value })
    }

    /// Multiplies a scalar by `scale`, spread geometrically along the curve
    pub fn multiply(target: Scalar, scale: f64) -> Self {
        Self::leaf(Kind::Multiply { target, scale })
    }

    /// Moves by `offset` in the particle's local frame
    pub fn translate(offset: DVec3) -> Self {
        Self::leaf(Kind::Translate(offset))
    }

    /// Turns by `degrees` per axis
    pub fn rotate(degrees: DVec3) -> Self {
        Self::leaf(Kind::Rotate(degrees))
    }

    /// Spawns `count * parallel` children per group over `times` groups
    pub fn emit(count: usize, times: usize, parallel: usize, body: Rc<BehaviorGen>) -> Self {
        Self::leaf(Kind::Emit(Emit::new(count, times, parallel, body)))
    }

    pub fn flair(count: usize, body: Rc<BehaviorGen>) -> Self {
        Self::leaf(Kind::OneShot(OneShot::new(Fanout::Flair { count, body })))
    }

    pub fn fireworks(count: usize, body: Rc<BehaviorGen>) -> Self {
        Self::leaf(Kind::OneShot(OneShot::new(Fanout::Fireworks { count, body })))
    }

    pub fn character(text: String, body: Rc<BehaviorGen>) -> Self {
        Self::leaf(Kind::OneShot(OneShot::new(Fanout::Character { text, body })))
    }

    pub fn text(text: String, offset: DVec3, body: Rc<BehaviorGen>) -> Self {
        Self::leaf(Kind::OneShot(OneShot::new(Fanout::Text {
            text,
            offset,
            body,
        })))
    }

    /// Signals an audio cue
    pub fn cue(cue: Cue) -> Self {
        Self::leaf(Kind::OneShot(OneShot::new(Fanout::Voice(cue))))
    }

    /// Runs children one after another
    ///
    /// Chains default to an unbounded lifespan.
    pub fn sequence(children: Vec<Behavior>) -> Self {
        Self {
            easing: Easing::Linear,
            lifespan: f64::INFINITY,
            kind: Kind::Chain(Chain::sequence(children)),
        }
    }

    /// Runs `body` up to `limit` times
    pub fn repeat(body: Behavior, limit: f64) -> Self {
        Self {
            easing: Easing::Linear,
            lifespan: f64::INFINITY,
            kind: Kind::Chain(Chain::repeat(body, limit)),
        }
    }

    /// Runs `body` until the lifespan runs out
    pub fn looping(body: Behavior) -> Self {
        Self {
            easing: Easing::Linear,
            lifespan: f64::INFINITY,
            kind: Kind::Chain(Chain::looping(body)),
        }
    }

    /// Races every child against the same window
    pub fn parallel(children: Vec<Behavior>) -> Self {
        Self::leaf(Kind::Parallel(Lanes::new(children)))
    }

    pub fn with_lifespan(mut self, lifespan: f64) -> Self {
        self.lifespan = lifespan;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn lifespan(&self) -> f64 {
        self.lifespan
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Default leaf completion for the window
    pub(crate) fn settle(lifespan: f64, start: f64, end: f64) -> Status {
        Status::from_leftover(end - lifespan.max(start))
    }

    /// Advance this node over `[start, end]`
    pub fn update(
        &mut self,
        stage: &mut Stage<'_>,
        particle: &mut Particle,
        start: f64,
        end: f64,
    ) -> Status {
        let Self {
            easing,
            lifespan,
            kind,
        } = self;
        let (easing, lifespan) = (*easing, *lifespan);

        match kind {
            Kind::Nop => {}
            Kind::Set {
                target,
                value,
                initial,
            } => {
                if start == 0.0 {
                    *initial = None;
                }
                let from = *initial.get_or_insert_with(|| particle.get(*target));
                let r = easing.at(end, lifespan);
                particle.set(*target, from * (1.0 - r) + *value * r);
            }
            Kind::Add { target, value } => {
                let r = easing.delta(start, end, lifespan);
                particle.set(*target, particle.get(*target) + *value * r);
            }
            Kind::Multiply { target, scale } => {
                let r = easing.delta(start, end, lifespan);
                particle.set(*target, particle.get(*target) * scale.powf(r));
            }
            Kind::Switch { effect, fired } => {
                if start == 0.0 {
                    *fired = false;
                }
                if !*fired && easing.at(end, lifespan) >= 1.0 {
                    *fired = true;
                    effect.apply(particle);
                }
            }
            Kind::Translate(offset) => {
                let r = easing.delta(start, end, lifespan);
                particle.translate(*offset * r);
            }
            Kind::Rotate(degrees) => {
                let r = easing.delta(start, end, lifespan);
                particle.rotate(*degrees * r);
            }
            Kind::Explode => particle.explode(stage.physics()),
            Kind::Emit(emit) => emit.update(stage, particle, easing, lifespan, start, end),
            Kind::OneShot(shot) => shot.update(stage, particle, start),
            Kind::Chain(chain) => return chain.update(stage, particle, lifespan, start, end),
            Kind::Parallel(lanes) => return lanes.update(stage, particle, lifespan, start, end),
        }

        Self::settle(lifespan, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;

    #[test]
    fn test_status_from_leftover() {
        assert_eq!(Status::from_leftover(2.0), Status::Done { leftover: 2.0 });
        assert_eq!(Status::from_leftover(0.0), Status::Done { leftover: 0.0 });
        assert_eq!(Status::from_leftover(-0.0), Status::Done { leftover: 0.0 });
        assert_eq!(Status::from_leftover(-1.0), Status::Running);
        assert_eq!(Status::from_leftover(f64::NEG_INFINITY), Status::Running);
        assert_eq!(Status::from_leftover(f64::NAN), Status::Running);
    }

    #[test]
    fn test_leaf_completion() {
        let mut h = Harness::new();
        let mut b = Behavior::nop().with_lifespan(10.0);
        assert_eq!(h.step(&mut b, 0.0, 4.0), Status::Running);
        assert_eq!(h.step(&mut b, 4.0, 8.0), Status::Running);
        assert_eq!(h.step(&mut b, 8.0, 12.0), Status::Done { leftover: 2.0 });
    }

    #[test]
    fn test_zero_lifespan_completes_immediately() {
        let mut h = Harness::new();
        let mut b = Behavior::nop();
        assert_eq!(h.step(&mut b, 0.0, 3.0), Status::Done { leftover: 3.0 });
    }

    #[test]
    fn test_set_interpolates_from_initial() {
        let mut h = Harness::new();
        h.particle.speed = 2.0;
        let mut b = Behavior::set(Scalar::Speed, 10.0).with_lifespan(4.0);

        h.step(&mut b, 0.0, 1.0);
        assert_eq!(h.particle.speed, 4.0);
        h.step(&mut b, 1.0, 2.0);
        assert_eq!(h.particle.speed, 6.0);
        let status = h.step(&mut b, 2.0, 5.0);
        assert_eq!(h.particle.speed, 10.0);
        assert!(status.is_done());
    }

    #[test]
    fn test_set_recaptures_on_restart() {
        let mut h = Harness::new();
        let mut b = Behavior::set(Scalar::Opacity, 0.0).with_lifespan(2.0);
        h.step(&mut b, 0.0, 2.0);
        assert_eq!(h.particle.opacity, 0.0);

        h.particle.opacity = 0.8;
        h.step(&mut b, 0.0, 1.0);
        assert!((h.particle.opacity - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_add_and_multiply_spread_over_lifespan() {
        let mut h = Harness::new();
        h.particle.hue = 10.0;
        h.particle.speed = 1.0;
        let mut add = Behavior::add(Scalar::Hue, 30.0).with_lifespan(3.0);
        let mut mul = Behavior::multiply(Scalar::Speed, 8.0).with_lifespan(3.0);

        for t in 0..3 {
            let (start, end) = (t as f64, t as f64 + 1.0);
            h.step(&mut add, start, end);
            h.step(&mut mul, start, end);
        }
        assert!((h.particle.hue - 40.0).abs() < 1e-9);
        assert!((h.particle.speed - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_close_fires_when_ratio_reaches_one() {
        let mut h = Harness::new();
        let mut b = Behavior::close().with_lifespan(2.0).with_easing(Easing::EaseOut);
        h.step(&mut b, 0.0, 1.0);
        assert!(!h.particle.closed);
        h.step(&mut b, 1.0, 2.0);
        assert!(h.particle.closed);
    }

    #[test]
    fn test_translate_follows_orientation() {
        let mut h = Harness::new();
        h.particle.rotate(DVec3::new(0.0, 90.0, 0.0));
        let mut b = Behavior::translate(DVec3::new(0.0, 0.0, 4.0)).with_lifespan(2.0);
        h.step(&mut b, 0.0, 1.0);
        h.step(&mut b, 1.0, 2.0);
        assert!((h.particle.position - DVec3::new(4.0, 0.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_rotate_split_windows_reach_full_angle() {
        let degrees = DVec3::new(0.0, 0.0, 120.0);
        let mut whole = Harness::new();
        let mut b = Behavior::rotate(degrees).with_lifespan(4.0);
        whole.step(&mut b, 0.0, 4.0);

        let mut split = Harness::new();
        let mut b = Behavior::rotate(degrees)
            .with_lifespan(4.0)
            .with_easing(Easing::EaseInOut);
        for t in 0..5 {
            split.step(&mut b, t as f64, t as f64 + 1.0);
        }

        let v = DVec3::new(1.0, 2.0, 3.0);
        let expected = glam::DQuat::from_rotation_z(120f64.to_radians()) * v;
        assert!((whole.particle.rotation * v - expected).length() < 1e-9);
        assert!((split.particle.rotation * v - expected).length() < 1e-9);
    }

    #[test]
    fn test_rotate_composes_onto_orientation() {
        let mut h = Harness::new();
        h.particle.rotate(DVec3::new(90.0, 0.0, 0.0));
        let before = h.particle.rotation;
        let mut b = Behavior::rotate(DVec3::new(0.0, 30.0, 0.0)).with_lifespan(3.0);
        for t in 0..3 {
            h.step(&mut b, t as f64, t as f64 + 1.0);
        }

        let v = DVec3::new(0.0, 0.0, 1.0);
        let expected = before * glam::DQuat::from_rotation_y(30f64.to_radians()) * v;
        assert!((h.particle.rotation * v - expected).length() < 1e-9);
    }

    #[test]
    fn test_explode_steps_once_per_call() {
        let mut h = Harness::new();
        let mut b = Behavior::explode().with_lifespan(100.0);
        h.step(&mut b, 0.0, 50.0);
        let after_one = h.particle.velocity.y;
        let dt = h.config.physics.dt;
        assert!((after_one - h.particle.gravity * dt).abs() < 1e-12);
    }
}
