//! Compiled generators
//!
//! A generator maps `(index, total)` to a value. Compilation produces a tree
//! of these enums; evaluating the tree is referentially transparent except
//! for the random operators, which draw from the [`SimRng`] they are given.

use crate::behavior::Behavior;
use crate::cue::Cue;
use crate::easing::Easing;
use crate::particle::Scalar;
use crate::rng::SimRng;
use glam::DVec3;
use std::rc::Rc;

/// Position of one instance among its siblings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Index {
    pub index: usize,
    pub total: usize,
}

impl Index {
    /// The index used for root behaviors and fan-out templates
    pub const ROOT: Index = Index { index: 0, total: 1 };

    pub fn new(index: usize, total: usize) -> Self {
        Self { index, total }
    }
}

/// Produces a value for an index
pub trait Generate {
    type Output;

    fn generate(&self, at: Index, rng: &mut SimRng) -> Self::Output;
}

/// How a choice/range/angle operator picks its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection {
    /// Derived from the index
    Each,
    /// Drawn from the RNG on every evaluation
    Random,
}

impl Selection {
    /// Ratio in `[0, 1]` used by range operators
    fn ratio(self, at: Index, rng: &mut SimRng) -> f64 {
        match self {
            Selection::Each if at.total <= 1 => 0.5,
            Selection::Each => at.index as f64 / (at.total - 1) as f64,
            Selection::Random => rng.next_f64(),
        }
    }

    /// Angle in degrees used by angle operators
    fn angle(self, at: Index, rng: &mut SimRng) -> f64 {
        match self {
            Selection::Each if at.total == 0 => 0.0,
            Selection::Each => {
                let quarter = if at.total == 2 { 90.0 } else { 0.0 };
                360.0 * at.index as f64 / at.total as f64 + quarter
            }
            Selection::Random => rng.next_f64() * 360.0,
        }
    }
}

/// Picks one of several sibling generators
#[derive(Debug, Clone, PartialEq)]
pub struct Choice<G> {
    pub selection: Selection,
    pub options: Vec<G>,
}

impl<G: Generate> Choice<G> {
    pub fn new(selection: Selection, options: Vec<G>) -> Self {
        Self { selection, options }
    }

    fn pick(&self, at: Index, rng: &mut SimRng) -> Option<&G> {
        let len = self.options.len();
        if len == 0 {
            return None;
        }
        let i = match self.selection {
            Selection::Each => at.index % len,
            Selection::Random => rng.index(len),
        };
        self.options.get(i)
    }
}

/// Number generator
#[derive(Debug, Clone, PartialEq)]
pub enum NumberGen {
    Const(f64),
    Range {
        selection: Selection,
        min: Box<NumberGen>,
        max: Box<NumberGen>,
    },
    Angle(Selection),
    Choice(Choice<NumberGen>),
}

impl Generate for NumberGen {
    type Output = f64;

    fn generate(&self, at: Index, rng: &mut SimRng) -> f64 {
        match self {
            NumberGen::Const(v) => *v,
            NumberGen::Range {
                selection,
                min,
                max,
            } => {
                let min = min.generate(at, rng);
                let max = max.generate(at, rng);
                let r = selection.ratio(at, rng);
                min * (1.0 - r) + max * r
            }
            NumberGen::Angle(selection) => selection.angle(at, rng),
            NumberGen::Choice(choice) => choice
                .pick(at, rng)
                .map_or(0.0, |option| option.generate(at, rng)),
        }
    }
}

/// String generator
#[derive(Debug, Clone, PartialEq)]
pub enum StringGen {
    Const(String),
    Choice(Choice<StringGen>),
}

impl Generate for StringGen {
    type Output = String;

    fn generate(&self, at: Index, rng: &mut SimRng) -> String {
        match self {
            StringGen::Const(s) => s.clone(),
            StringGen::Choice(choice) => choice
                .pick(at, rng)
                .map_or_else(String::new, |option| option.generate(at, rng)),
        }
    }
}

/// Easing generator
#[derive(Debug, Clone, PartialEq)]
pub enum EasingGen {
    Const(Easing),
    Choice(Choice<EasingGen>),
}

impl Generate for EasingGen {
    type Output = Easing;

    fn generate(&self, at: Index, rng: &mut SimRng) -> Easing {
        match self {
            EasingGen::Const(e) => *e,
            EasingGen::Choice(choice) => choice
                .pick(at, rng)
                .map_or(Easing::Linear, |option| option.generate(at, rng)),
        }
    }
}

/// Three number generators evaluated as a vector
#[derive(Debug, Clone, PartialEq)]
pub struct Vec3Gen {
    pub x: NumberGen,
    pub y: NumberGen,
    pub z: NumberGen,
}

impl Generate for Vec3Gen {
    type Output = DVec3;

    fn generate(&self, at: Index, rng: &mut SimRng) -> DVec3 {
        let x = self.x.generate(at, rng);
        let y = self.y.generate(at, rng);
        let z = self.z.generate(at, rng);
        DVec3::new(x, y, z)
    }
}

/// How a scalar behavior combines its operand with the current value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarOp {
    Set,
    Add,
    Multiply,
}

/// Behavior factory
///
/// Templates that spawn children at runtime hold their body behind an
/// `Rc` so every spawned particle can build its own fresh instance.
#[derive(Debug, Clone, PartialEq)]
pub enum BehaviorGen {
    Nop,
    Close,
    Explode,
    Voice(Cue),
    Scalar {
        op: ScalarOp,
        target: Scalar,
        value: NumberGen,
    },
    Translate(Vec3Gen),
    Rotate(Vec3Gen),
    Emit {
        count: NumberGen,
        times: NumberGen,
        parallel: NumberGen,
        body: Rc<BehaviorGen>,
    },
    Loop(Box<BehaviorGen>),
    Repeat {
        limit: NumberGen,
        body: Box<BehaviorGen>,
    },
    Flair {
        count: NumberGen,
        body: Rc<BehaviorGen>,
    },
    Fireworks {
        count: NumberGen,
        body: Rc<BehaviorGen>,
    },
    Character {
        text: StringGen,
        body: Rc<BehaviorGen>,
    },
    Text {
        text: StringGen,
        offset: Vec3Gen,
        body: Rc<BehaviorGen>,
    },
    /// Lanes of sequential statements run in parallel
    Block(Vec<Vec<BehaviorGen>>),
    Lifespan {
        lifespan: NumberGen,
        body: Box<BehaviorGen>,
    },
    Eased {
        easing: EasingGen,
        body: Box<BehaviorGen>,
    },
    Choice(Choice<BehaviorGen>),
}

impl Generate for BehaviorGen {
    type Output = Behavior;

    fn generate(&self, at: Index, rng: &mut SimRng) -> Behavior {
        match self {
            BehaviorGen::Nop => Behavior::nop(),
            BehaviorGen::Close => Behavior::close(),
            BehaviorGen::Explode => Behavior::explode(),
            BehaviorGen::Voice(cue) => Behavior::cue(*cue),
            BehaviorGen::Scalar { op, target, value } => {
                let value = value.generate(at, rng);
                match op {
                    ScalarOp::Set => Behavior::set(*target, value),
                    ScalarOp::Add => Behavior::add(*target, value),
                    ScalarOp::Multiply => Behavior::multiply(*target, value),
                }
            }
            BehaviorGen::Translate(offset) => Behavior::translate(offset.generate(at, rng)),
            BehaviorGen::Rotate(degrees) => Behavior::rotate(degrees.generate(at, rng)),
            BehaviorGen::Emit {
                count,
                times,
                parallel,
                body,
            } => {
                let count = to_count(count.generate(at, rng));
                let times = to_count(times.generate(at, rng));
                let parallel = to_count(parallel.generate(at, rng));
                Behavior::emit(count, times, parallel, Rc::clone(body))
            }
            BehaviorGen::Loop(body) => Behavior::looping(body.generate(at, rng)),
            BehaviorGen::Repeat { limit, body } => {
                let limit = limit.generate(at, rng);
                Behavior::repeat(body.generate(at, rng), limit)
            }
            BehaviorGen::Flair { count, body } => {
                Behavior::flair(to_count(count.generate(at, rng)), Rc::clone(body))
            }
            BehaviorGen::Fireworks { count, body } => {
                Behavior::fireworks(to_count(count.generate(at, rng)), Rc::clone(body))
            }
            BehaviorGen::Character { text, body } => {
                Behavior::character(text.generate(at, rng), Rc::clone(body))
            }
            BehaviorGen::Text { text, offset, body } => {
                let text = text.generate(at, rng);
                Behavior::text(text, offset.generate(at, rng), Rc::clone(body))
            }
            BehaviorGen::Block(lanes) => {
                let lanes = lanes
                    .iter()
                    .map(|lane| {
                        Behavior::sequence(lane.iter().map(|g| g.generate(at, rng)).collect())
                    })
                    .collect();
                Behavior::parallel(lanes)
            }
            BehaviorGen::Lifespan { lifespan, body } => {
                let behavior = body.generate(at, rng);
                behavior.with_lifespan(lifespan.generate(at, rng))
            }
            BehaviorGen::Eased { easing, body } => {
                let behavior = body.generate(at, rng);
                behavior.with_easing(easing.generate(at, rng))
            }
            BehaviorGen::Choice(choice) => choice
                .pick(at, rng)
                .map_or_else(Behavior::nop, |option| option.generate(at, rng)),
        }
    }
}

/// Upper bound on the particles one emit or fan-out call may create
pub const MAX_SPAWN: usize = 100_000;

/// Truncate a generated number to a count in `0..=MAX_SPAWN`
pub(crate) fn to_count(n: f64) -> usize {
    if n.is_finite() && n > 0.0 {
        n.floor().min(MAX_SPAWN as f64) as usize
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn each_range(min: f64, max: f64) -> NumberGen {
        NumberGen::Range {
            selection: Selection::Each,
            min: Box::new(NumberGen::Const(min)),
            max: Box::new(NumberGen::Const(max)),
        }
    }

    #[test]
    fn test_const_ignores_index() {
        let mut rng = SimRng::new(1);
        let g = NumberGen::Const(4.5);
        for total in 1..5 {
            for index in 0..total {
                assert_eq!(g.generate(Index::new(index, total), &mut rng), 4.5);
            }
        }
    }

    #[test]
    fn test_each_range() {
        let mut rng = SimRng::new(1);
        let g = each_range(10.0, 20.0);
        assert_eq!(g.generate(Index::new(0, 1), &mut rng), 15.0);

        let values: Vec<f64> = (0..5)
            .map(|i| g.generate(Index::new(i, 5), &mut rng))
            .collect();
        assert_eq!(values, vec![10.0, 12.5, 15.0, 17.5, 20.0]);
    }

    #[test]
    fn test_random_range_stays_in_bounds() {
        let mut rng = SimRng::new(11);
        let g = NumberGen::Range {
            selection: Selection::Random,
            min: Box::new(NumberGen::Const(-5.0)),
            max: Box::new(NumberGen::Const(15.0)),
        };
        let (mut low, mut high) = (f64::INFINITY, f64::NEG_INFINITY);
        for i in 0..1000 {
            let v = g.generate(Index::new(i % 7, 7), &mut rng);
            assert!((-5.0..=15.0).contains(&v), "sample {} out of range", v);
            low = low.min(v);
            high = high.max(v);
        }
        // Draws cover the range rather than collapsing to one value
        assert!(low < 0.0 && high > 10.0);
    }

    #[test]
    fn test_each_angle() {
        let mut rng = SimRng::new(1);
        let g = NumberGen::Angle(Selection::Each);
        let two: Vec<f64> = (0..2)
            .map(|i| g.generate(Index::new(i, 2), &mut rng))
            .collect();
        assert_eq!(two, vec![90.0, 270.0]);

        let four: Vec<f64> = (0..4)
            .map(|i| g.generate(Index::new(i, 4), &mut rng))
            .collect();
        assert_eq!(four, vec![0.0, 90.0, 180.0, 270.0]);
    }

    #[test]
    fn test_random_angle_range() {
        let mut rng = SimRng::new(3);
        let g = NumberGen::Angle(Selection::Random);
        for _ in 0..100 {
            let a = g.generate(Index::ROOT, &mut rng);
            assert!((0.0..360.0).contains(&a));
        }
    }

    #[test]
    fn test_each_choice_wraps() {
        let mut rng = SimRng::new(1);
        let g = NumberGen::Choice(Choice::new(
            Selection::Each,
            vec![NumberGen::Const(1.0), NumberGen::Const(2.0), NumberGen::Const(3.0)],
        ));
        let values: Vec<f64> = (0..5)
            .map(|i| g.generate(Index::new(i, 5), &mut rng))
            .collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_random_choice_stays_in_options() {
        let mut rng = SimRng::new(9);
        let g = StringGen::Choice(Choice::new(
            Selection::Random,
            vec![StringGen::Const("a".into()), StringGen::Const("b".into())],
        ));
        for _ in 0..50 {
            let s = g.generate(Index::ROOT, &mut rng);
            assert!(s == "a" || s == "b");
        }
    }

    #[test]
    fn test_to_count() {
        assert_eq!(to_count(2.9), 2);
        assert_eq!(to_count(-1.0), 0);
        assert_eq!(to_count(f64::NAN), 0);
        assert_eq!(to_count(f64::INFINITY), 0);
        assert_eq!(to_count(1e15), MAX_SPAWN);
    }
}
