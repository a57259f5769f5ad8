//! Easing functions for animations

use kine_core::{ConfigError, ConfigResult};
use serde::Deserialize;

/// Easing function type
///
/// Every variant maps [0, 1] monotonically onto [0, 1] with `apply(0) == 0`
/// and `apply(1) == 1`. Progress outside [0, 1] is clamped before easing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    /// Logistic S-curve (the renderer's `smooth` rate function)
    Smooth,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    CubicBezier(f64, f64, f64, f64),
}

/// Steepness of [`Easing::Smooth`]
const SMOOTH_INFLECTION: f64 = 10.0;

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        // NaN progress is treated as "not started"
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if t == 0.0 || t == 1.0 {
            return t;
        }
        let eased = match self {
            Easing::Linear => t,
            Easing::Smooth => smooth(t),
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInQuart => t * t * t * t,
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, *x1, *y1, *x2, *y2),
        };
        eased.clamp(0.0, 1.0)
    }

    /// Check that the curve stays monotone inside the unit square.
    ///
    /// Only [`Easing::CubicBezier`] carries parameters; its control points
    /// must all lie in [0, 1].
    pub fn validate(&self) -> ConfigResult<()> {
        if let Easing::CubicBezier(x1, y1, x2, y2) = *self {
            let in_unit = |v: f64| (0.0..=1.0).contains(&v);
            if ![x1, y1, x2, y2].into_iter().all(in_unit) {
                return Err(ConfigError::InvalidEasing(format!(
                    "cubic bezier control points must lie in [0, 1], got ({x1}, {y1}, {x2}, {y2})"
                )));
            }
        }
        Ok(())
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn smooth(t: f64) -> f64 {
    let error = sigmoid(-SMOOTH_INFLECTION / 2.0);
    ((sigmoid(SMOOTH_INFLECTION * (t - 0.5)) - error) / (1.0 - 2.0 * error)).clamp(0.0, 1.0)
}

/// One axis of a cubic bezier anchored at 0 and 1, in polynomial form
#[derive(Clone, Copy)]
struct BezierAxis {
    a: f64,
    b: f64,
    c: f64,
}

impl BezierAxis {
    fn new(p1: f64, p2: f64) -> Self {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        Self {
            a: 1.0 - c - b,
            b,
            c,
        }
    }

    #[inline]
    fn at(self, t: f64) -> f64 {
        ((self.a * t + self.b) * t + self.c) * t
    }

    #[inline]
    fn derivative(self, t: f64) -> f64 {
        (3.0 * self.a * t + 2.0 * self.b) * t + self.c
    }

    /// Curve parameter whose value is `x`; `x` must lie in [0, 1]
    fn solve(self, x: f64) -> f64 {
        const EPSILON: f64 = 1e-9;

        let mut t = x;
        for _ in 0..8 {
            let error = self.at(t) - x;
            if error.abs() < EPSILON {
                return t;
            }
            let slope = self.derivative(t);
            if slope.abs() < EPSILON {
                break;
            }
            t -= error / slope;
        }

        // Newton stalled on a flat stretch; bisect the unit interval
        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        t = x;
        for _ in 0..48 {
            let value = self.at(t);
            if (value - x).abs() < EPSILON {
                break;
            }
            if value < x {
                lo = t;
            } else {
                hi = t;
            }
            t = 0.5 * (lo + hi);
        }
        t
    }
}

/// `y` of the bezier with control points `(x1, y1)`, `(x2, y2)` at `x`
fn cubic_bezier_ease(x: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let t = BezierAxis::new(x1, x2).solve(x);
    BezierAxis::new(y1, y2).at(t)
}
