//! kine Numeric Layer
//!
//! Pure, deterministic evaluators used by derived nodes:
//!
//! - [`SphereSampler`]: golden-angle points on a sphere
//! - [`FieldEvaluator`]: closed-form vector fields with explicit edge-case clamps
//! - [`PiecewiseCurve`]: monotone piecewise-linear mapping with clamped ends
//! - [`WaveSurface`]: a radially travelling height field
//!
//! # Example
//!
//! ```rust
//! use kine_fields::{sample_field, ConductorField, PiecewiseCurve, SphereSampler};
//!
//! let sampler = SphereSampler::new(500, 3.0).unwrap();
//! let samples = sample_field(&sampler, &ConductorField, 0.0);
//! assert_eq!(samples.len(), 500);
//!
//! let curve = PiecewiseCurve::new(vec![(0.0, 40.0), (1.0, 100.0)]).unwrap();
//! assert_eq!(curve.evaluate(0.5), 70.0);
//! ```

pub mod curve;
pub mod field;
pub mod sphere;
pub mod surface;

pub use curve::PiecewiseCurve;
pub use field::{
    clamped_powf, clamped_sqrt, sample_field, ConductorField, FieldEvaluator, OscillatoryField,
    RadialField, SampledPoint, ShieldedField,
};
pub use sphere::SphereSampler;
pub use surface::WaveSurface;
