//! Easing curves
//!
//! A curve maps normalized progress in `[0, 1]` to an eased ratio. Every
//! curve is exact at both ends, so a caller may test `ratio == 1.0`.

use serde::{Deserialize, Serialize};

/// Easing curve attached to every behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Evaluate the curve at normalized progress `t` (clamped to `[0, 1]`)
    pub fn curve(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }

    /// Eased ratio reached at elapsed time `t` of a `lifespan`
    ///
    /// A non-positive lifespan is a step: 0 until any time has passed, 1 after.
    pub fn at(self, t: f64, lifespan: f64) -> f64 {
        if lifespan > 0.0 {
            self.curve(t / lifespan)
        } else if t > 0.0 {
            1.0
        } else {
            0.0
        }
    }

    /// Ratio gained over the window `[start, end]`
    pub fn delta(self, start: f64, end: f64, lifespan: f64) -> f64 {
        self.at(end, lifespan) - self.at(start, lifespan)
    }

    /// The registry name of this curve
    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
        }
    }

    /// All curves, in registry order
    pub fn all() -> [Easing; 4] {
        [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
        ]
    }
}
