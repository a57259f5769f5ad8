//! Derived diagram nodes
//!
//! Each node is a pure function of the observables it declares (and, for the
//! time-varying ones, of the tick time). They are rebuilt every tick and
//! never cache renderables between ticks.

use kine_animation::{Dependencies, DerivedNode, Observable, Scope};
use kine_core::{Anchor, Arrow, Color, Label, Renderable, Vec3};
use kine_fields::{sample_field, FieldEvaluator, PiecewiseCurve, SphereSampler, WaveSurface};
use smallvec::smallvec;

fn time_dependency(time: Option<Observable<f64>>) -> Dependencies {
    time.map(|t| smallvec![t.id()]).unwrap_or_default()
}

/// Scene time: the time observable when one is bound, otherwise the clock
fn scene_time(scope: &Scope<'_>, time: Option<Observable<f64>>) -> f64 {
    match time {
        Some(observable) => scope.get(observable),
        None => scope.now(),
    }
}

// ============================================================================
// Field arrows
// ============================================================================

/// Arrows `p -> p + scale * E(p, t)` at the sphere sample positions
pub struct FieldArrowsNode {
    sampler: SphereSampler,
    field: Box<dyn FieldEvaluator>,
    arrow_scale: f64,
    color: Color,
    time: Option<Observable<f64>>,
}

impl FieldArrowsNode {
    pub fn new(
        sampler: SphereSampler,
        field: Box<dyn FieldEvaluator>,
        arrow_scale: f64,
        color: Color,
    ) -> Self {
        Self {
            sampler,
            field,
            arrow_scale,
            color,
            time: None,
        }
    }

    /// Drive the field's time from an observable instead of the clock
    pub fn with_time(mut self, time: Observable<f64>) -> Self {
        self.time = Some(time);
        self
    }

    pub fn sample_count(&self) -> usize {
        self.sampler.count()
    }
}

impl DerivedNode for FieldArrowsNode {
    fn dependencies(&self) -> Dependencies {
        time_dependency(self.time)
    }

    fn recompute(&self, scope: &Scope<'_>) -> Renderable {
        let time = scene_time(scope, self.time);
        let arrows = sample_field(&self.sampler, &*self.field, time)
            .into_iter()
            .map(|point| {
                let tip = point.position + point.field * self.arrow_scale;
                Arrow::new(point.position, tip, self.color)
            })
            .collect();
        Renderable::Arrows(arrows)
    }

    fn name(&self) -> &str {
        self.field.name()
    }
}

// ============================================================================
// Curve tracker
// ============================================================================

/// A dot riding a curve at `(x, curve(x))`
pub struct CurveTrackerNode {
    x: Observable<f64>,
    curve: PiecewiseCurve,
    radius: f64,
    color: Color,
}

impl CurveTrackerNode {
    pub fn new(x: Observable<f64>, curve: PiecewiseCurve, radius: f64, color: Color) -> Self {
        Self {
            x,
            curve,
            radius,
            color,
        }
    }
}

impl DerivedNode for CurveTrackerNode {
    fn dependencies(&self) -> Dependencies {
        smallvec![self.x.id()]
    }

    fn recompute(&self, scope: &Scope<'_>) -> Renderable {
        let x = scope.get(self.x);
        Renderable::Dot {
            position: Vec3::new(x, self.curve.evaluate(x), 0.0),
            radius: self.radius,
            color: self.color,
        }
    }

    fn name(&self) -> &str {
        "curve tracker"
    }
}

// ============================================================================
// Readout
// ============================================================================

/// Format `value` truncated toward zero with thousands separators
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let whole = value.trunc() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if whole < 0 {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Two labels reading out the tracked input and the curve value:
/// `net sales $130,000` and `payout 40.0%`
pub struct ReadoutNode {
    x: Observable<f64>,
    curve: PiecewiseCurve,
    x_label: String,
    y_label: String,
    color: Color,
}

impl ReadoutNode {
    pub fn new(x: Observable<f64>, curve: PiecewiseCurve) -> Self {
        Self {
            x,
            curve,
            x_label: "net sales".to_string(),
            y_label: "payout".to_string(),
            color: Color::WHITE,
        }
    }

    pub fn with_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl DerivedNode for ReadoutNode {
    fn dependencies(&self) -> Dependencies {
        smallvec![self.x.id()]
    }

    fn recompute(&self, scope: &Scope<'_>) -> Renderable {
        let x = scope.get(self.x);
        let y = self.curve.evaluate(x);
        let input = Label::new(format!("{} ${}", self.x_label, format_thousands(x)))
            .with_anchor(Anchor::TopLeft)
            .with_color(self.color);
        let output = Label::new(format!("{} {:.1}%", self.y_label, y))
            .with_anchor(Anchor::TopRight)
            .with_color(self.color);
        Renderable::Group(vec![Renderable::Label(input), Renderable::Label(output)])
    }

    fn name(&self) -> &str {
        "readout"
    }
}

// ============================================================================
// Surface
// ============================================================================

/// A wave surface mesh rebuilt every tick
pub struct SurfaceNode {
    surface: WaveSurface,
    color: Color,
    time: Option<Observable<f64>>,
}

impl SurfaceNode {
    pub fn new(surface: WaveSurface, color: Color) -> Self {
        Self {
            surface,
            color,
            time: None,
        }
    }

    pub fn with_time(mut self, time: Observable<f64>) -> Self {
        self.time = Some(time);
        self
    }
}

impl DerivedNode for SurfaceNode {
    fn dependencies(&self) -> Dependencies {
        time_dependency(self.time)
    }

    fn recompute(&self, scope: &Scope<'_>) -> Renderable {
        let time = scene_time(scope, self.time);
        Renderable::Mesh(self.surface.mesh(time, self.color))
    }

    fn name(&self) -> &str {
        "surface"
    }
}
