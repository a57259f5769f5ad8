//! Closed-form vector fields
//!
//! Every evaluator is total: finite input never produces NaN or a panic.
//! Negative radicands are clamped to zero through [`clamped_sqrt`] and
//! [`clamped_powf`], and points inside a shielded region or at the
//! singularity evaluate to the zero vector.

use crate::sphere::SphereSampler;
use kine_core::error::{ensure_finite, ensure_positive};
use kine_core::{ConfigError, ConfigResult, Vec3};

/// Square root with negative (and NaN) radicands clamped to zero
#[inline]
pub fn clamped_sqrt(value: f64) -> f64 {
    if value > 0.0 {
        value.sqrt()
    } else {
        0.0
    }
}

/// `base^exponent` with non-positive (and NaN) bases clamped to zero
#[inline]
pub fn clamped_powf(base: f64, exponent: f64) -> f64 {
    if base > 0.0 {
        base.powf(exponent)
    } else {
        0.0
    }
}

#[inline]
fn finite_or_zero(v: Vec3) -> Vec3 {
    if v.is_finite() {
        v
    } else {
        Vec3::ZERO
    }
}

fn ensure_non_negative(name: &'static str, value: f64) -> ConfigResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else if value.is_finite() {
        Err(ConfigError::NonPositive { name, value })
    } else {
        Err(ConfigError::NonFinite { name, value })
    }
}

/// A position (and time) to vector mapping
pub trait FieldEvaluator {
    /// Field vector at `position`, `time` seconds into the scene
    fn evaluate(&self, position: Vec3, time: f64) -> Vec3;

    /// Exponent `n` of the magnitude law `|E| ∝ 1 / r^n` along
    /// [`falloff_axis`](Self::falloff_axis)
    fn falloff_exponent(&self) -> f64;

    /// Unit direction from the origin along which
    /// [`falloff_exponent`](Self::falloff_exponent) holds
    fn falloff_axis(&self) -> Vec3 {
        Vec3::X
    }

    fn is_time_varying(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str;
}

impl<F: FieldEvaluator + ?Sized> FieldEvaluator for Box<F> {
    fn evaluate(&self, position: Vec3, time: f64) -> Vec3 {
        (**self).evaluate(position, time)
    }

    fn falloff_exponent(&self) -> f64 {
        (**self).falloff_exponent()
    }

    fn falloff_axis(&self) -> Vec3 {
        (**self).falloff_axis()
    }

    fn is_time_varying(&self) -> bool {
        (**self).is_time_varying()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// A sample position with the field vector evaluated there
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampledPoint {
    pub position: Vec3,
    pub field: Vec3,
}

/// Evaluate `field` at every point of `sampler`
pub fn sample_field<F: FieldEvaluator + ?Sized>(
    sampler: &SphereSampler,
    field: &F,
    time: f64,
) -> Vec<SampledPoint> {
    sampler
        .iter()
        .map(|position| SampledPoint {
            position,
            field: field.evaluate(position, time),
        })
        .collect()
}

// ============================================================================
// Radial
// ============================================================================

/// `k * r̂ / r^n` around a center
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadialField {
    strength: f64,
    exponent: f64,
    center: Vec3,
    shield_radius: f64,
}

impl RadialField {
    /// Inverse-square field of the given strength around the origin
    pub fn new(strength: f64) -> ConfigResult<Self> {
        Ok(Self {
            strength: ensure_finite("strength", strength)?,
            exponent: 2.0,
            center: Vec3::ZERO,
            shield_radius: 0.0,
        })
    }

    pub fn with_exponent(mut self, exponent: f64) -> ConfigResult<Self> {
        self.exponent = ensure_finite("exponent", exponent)?;
        Ok(self)
    }

    /// Points closer than `radius` to the center see no field
    pub fn with_shield_radius(mut self, radius: f64) -> ConfigResult<Self> {
        self.shield_radius = ensure_non_negative("shield_radius", radius)?;
        Ok(self)
    }

    pub fn with_center(mut self, center: Vec3) -> ConfigResult<Self> {
        ensure_finite("center.x", center.x)?;
        ensure_finite("center.y", center.y)?;
        ensure_finite("center.z", center.z)?;
        self.center = center;
        Ok(self)
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn shield_radius(&self) -> f64 {
        self.shield_radius
    }
}

impl FieldEvaluator for RadialField {
    fn evaluate(&self, position: Vec3, _time: f64) -> Vec3 {
        let offset = position - self.center;
        let r = offset.length();
        if r == 0.0 || r < self.shield_radius {
            return Vec3::ZERO;
        }
        finite_or_zero(offset * (self.strength / clamped_powf(r, self.exponent + 1.0)))
    }

    fn falloff_exponent(&self) -> f64 {
        self.exponent
    }

    fn name(&self) -> &'static str {
        "radial"
    }
}

// ============================================================================
// Conductor
// ============================================================================

/// Field around a charged conductor filling the half-space `z < 0`.
///
/// Below the surface the field vanishes. Above it the y component is
/// replaced by `sqrt(z)`, so the arrows bend away from the surface.
///
/// On the surface (`z = 0`) the field is `x̂ / |x|`, an inverse-first-power
/// law along x. Moving up along +z the magnitude grows instead, so the
/// stated exponent only holds on the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConductorField;

impl FieldEvaluator for ConductorField {
    fn evaluate(&self, position: Vec3, _time: f64) -> Vec3 {
        let Vec3 { x, z, .. } = position;
        if z < 0.0 {
            return Vec3::ZERO;
        }
        let y = clamped_sqrt(z);
        let r = clamped_sqrt(x * x + clamped_powf(y, 1.5) + clamped_sqrt(z));
        if r == 0.0 {
            return Vec3::ZERO;
        }
        finite_or_zero(Vec3::new(x, y, z) / (r * r))
    }

    fn falloff_exponent(&self) -> f64 {
        1.0
    }

    fn name(&self) -> &'static str {
        "conductor"
    }
}

// ============================================================================
// Shielded
// ============================================================================

/// Field expelled from a superconducting core.
///
/// Uses the anisotropic radius `sqrt(x^4 + y^2 + z^2)`; inside
/// `shield_radius` the field is zero.
///
/// In the yz-plane the radius is the distance from the origin, so
/// `|E| = |p| / r^2 = 1 / r`. Along x it falls as `1 / |x|^3`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShieldedField {
    shield_radius: f64,
}

impl ShieldedField {
    pub const DEFAULT_SHIELD_RADIUS: f64 = 0.1;

    pub fn new(shield_radius: f64) -> ConfigResult<Self> {
        Ok(Self {
            shield_radius: ensure_non_negative("shield_radius", shield_radius)?,
        })
    }

    pub fn shield_radius(&self) -> f64 {
        self.shield_radius
    }
}

impl Default for ShieldedField {
    fn default() -> Self {
        Self {
            shield_radius: Self::DEFAULT_SHIELD_RADIUS,
        }
    }
}

impl FieldEvaluator for ShieldedField {
    fn evaluate(&self, position: Vec3, _time: f64) -> Vec3 {
        let Vec3 { x, y, z } = position;
        let r = clamped_sqrt(x.powi(4) + y * y + z * z);
        if r == 0.0 || r < self.shield_radius {
            return Vec3::ZERO;
        }
        finite_or_zero(position / (r * r))
    }

    fn falloff_exponent(&self) -> f64 {
        1.0
    }

    fn falloff_axis(&self) -> Vec3 {
        Vec3::Y
    }

    fn name(&self) -> &'static str {
        "shielded"
    }
}

// ============================================================================
// Oscillatory
// ============================================================================

/// Outgoing radial wave `A * sin(k r - w t) * r̂ / r^n`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OscillatoryField {
    amplitude: f64,
    wavenumber: f64,
    angular_frequency: f64,
    exponent: f64,
    shield_radius: f64,
}

impl OscillatoryField {
    pub fn new(amplitude: f64, wavenumber: f64, angular_frequency: f64) -> ConfigResult<Self> {
        Ok(Self {
            amplitude: ensure_finite("amplitude", amplitude)?,
            wavenumber: ensure_finite("wavenumber", wavenumber)?,
            angular_frequency: ensure_finite("angular_frequency", angular_frequency)?,
            exponent: 1.0,
            shield_radius: 0.0,
        })
    }

    pub fn with_exponent(mut self, exponent: f64) -> ConfigResult<Self> {
        self.exponent = ensure_finite("exponent", exponent)?;
        Ok(self)
    }

    pub fn with_shield_radius(mut self, radius: f64) -> ConfigResult<Self> {
        self.shield_radius = ensure_non_negative("shield_radius", radius)?;
        Ok(self)
    }

    /// Seconds per full oscillation at a fixed point
    pub fn period(&self) -> ConfigResult<f64> {
        let w = ensure_positive("angular_frequency", self.angular_frequency.abs())?;
        Ok(std::f64::consts::TAU / w)
    }
}

impl FieldEvaluator for OscillatoryField {
    fn evaluate(&self, position: Vec3, time: f64) -> Vec3 {
        let r = position.length();
        if r == 0.0 || r < self.shield_radius {
            return Vec3::ZERO;
        }
        let phase = self.wavenumber * r - self.angular_frequency * time;
        let scale = self.amplitude * phase.sin() / clamped_powf(r, self.exponent + 1.0);
        finite_or_zero(position * scale)
    }

    fn falloff_exponent(&self) -> f64 {
        self.exponent
    }

    fn is_time_varying(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "oscillatory"
    }
}
