//! Piecewise-linear curves

use kine_core::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// A monotone non-decreasing piecewise-linear mapping.
///
/// Inputs left of the first breakpoint evaluate to the first y, inputs right
/// of the last breakpoint to the last y. Between breakpoints the value is
/// interpolated linearly, and it is exact at every breakpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(f64, f64)>", into = "Vec<(f64, f64)>")]
pub struct PiecewiseCurve {
    points: Vec<(f64, f64)>,
}

impl PiecewiseCurve {
    pub fn new(points: Vec<(f64, f64)>) -> ConfigResult<Self> {
        if points.is_empty() {
            return Err(ConfigError::EmptyBreakpoints);
        }
        for &(x, y) in &points {
            if !x.is_finite() {
                return Err(ConfigError::NonFinite {
                    name: "breakpoint x",
                    value: x,
                });
            }
            if !y.is_finite() {
                return Err(ConfigError::NonFinite {
                    name: "breakpoint y",
                    value: y,
                });
            }
        }
        for (index, pair) in points.windows(2).enumerate() {
            let (previous, current) = (pair[0], pair[1]);
            if current.0 <= previous.0 {
                return Err(ConfigError::UnorderedBreakpoints {
                    index: index + 1,
                    x: current.0,
                    previous: previous.0,
                });
            }
            if current.1 < previous.1 {
                return Err(ConfigError::DecreasingBreakpoints {
                    index: index + 1,
                    y: current.1,
                    previous: previous.1,
                });
            }
        }
        Ok(Self { points })
    }

    pub fn breakpoints(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// First and last breakpoint x
    pub fn domain(&self) -> (f64, f64) {
        let first = self.points[0].0;
        let last = self.points[self.points.len() - 1].0;
        (first, last)
    }

    /// First and last breakpoint y
    pub fn range(&self) -> (f64, f64) {
        let first = self.points[0].1;
        let last = self.points[self.points.len() - 1].1;
        (first, last)
    }

    /// Index `i` of the segment `(x_i, x_{i+1}]` containing `x`.
    ///
    /// `None` when `x` is at or left of the first breakpoint, right of the
    /// last one, or NaN.
    pub fn segment_index(&self, x: f64) -> Option<usize> {
        let (first, last) = self.domain();
        if x.is_nan() || x <= first || x > last {
            return None;
        }
        // First breakpoint with x_j >= x; x > first so j >= 1
        let upper = self.points.partition_point(|&(px, _)| px < x);
        Some(upper - 1)
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let (first_x, first_y) = self.points[0];
        if x.is_nan() || x <= first_x {
            return first_y;
        }
        let Some(index) = self.segment_index(x) else {
            return self.points[self.points.len() - 1].1;
        };
        let (x0, y0) = self.points[index];
        let (x1, y1) = self.points[index + 1];
        if x == x1 {
            return y1;
        }
        let t = (x - x0) / (x1 - x0);
        y0 + (y1 - y0) * t
    }
}

impl TryFrom<Vec<(f64, f64)>> for PiecewiseCurve {
    type Error = ConfigError;

    fn try_from(points: Vec<(f64, f64)>) -> ConfigResult<Self> {
        Self::new(points)
    }
}

impl From<PiecewiseCurve> for Vec<(f64, f64)> {
    fn from(curve: PiecewiseCurve) -> Self {
        curve.points
    }
}
