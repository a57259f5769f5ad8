//! Golden-angle sampling of points on a sphere

use kine_core::error::{ensure_finite, ensure_positive};
use kine_core::{ConfigError, ConfigResult, Vec3};
use std::f64::consts::PI;

/// Deterministic, near-uniform points on a sphere.
///
/// Point `i` of `n` sits at polar angle `acos(1 - 2(i + 0.5)/n)` and azimuth
/// `pi (1 + sqrt 5)(i + 0.5)`. The same `(n, radius)` always yields the same
/// points in the same order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereSampler {
    count: usize,
    radius: f64,
    center: Vec3,
}

impl SphereSampler {
    pub fn new(count: usize, radius: f64) -> ConfigResult<Self> {
        if count == 0 {
            return Err(ConfigError::NonPositiveCount {
                name: "sample_count",
            });
        }
        Ok(Self {
            count,
            radius: ensure_positive("radius", radius)?,
            center: Vec3::ZERO,
        })
    }

    /// Offset every point by `center`
    pub fn centered_at(mut self, center: Vec3) -> ConfigResult<Self> {
        ensure_finite("center.x", center.x)?;
        ensure_finite("center.y", center.y)?;
        ensure_finite("center.z", center.z)?;
        self.center = center;
        Ok(self)
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// The `index`-th point, or `None` past the end
    pub fn point(&self, index: usize) -> Option<Vec3> {
        if index >= self.count {
            return None;
        }
        let offset = index as f64 + 0.5;
        let phi = (1.0 - 2.0 * offset / self.count as f64).acos();
        let theta = PI * (1.0 + 5f64.sqrt()) * offset;
        let unit = Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos());
        Some(self.center + unit * self.radius)
    }

    pub fn iter(&self) -> impl Iterator<Item = Vec3> + '_ {
        (0..self.count).filter_map(move |index| self.point(index))
    }

    /// Every point, in index order
    pub fn sample(&self) -> Vec<Vec3> {
        self.iter().collect()
    }
}
