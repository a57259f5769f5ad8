//! Scene building and playback
//!
//! [`Scene::build`] turns a [`SceneConfig`] into a [`Timeline`] with its
//! observables, derived nodes, caption morph and script. All validation
//! happens here so that playback itself cannot fail.

use crate::config::{FieldConfig, FieldKind, SceneConfig, StepConfig, ValueConfig};
use crate::error::Result;
use crate::nodes::{CurveTrackerNode, FieldArrowsNode, ReadoutNode, SurfaceNode};
use kine_animation::{MorphId, Observable, ObservableId, Segment, SegmentSummary, Timeline};
use kine_core::error::{ensure_finite, ensure_positive};
use kine_core::{Anchor, Color, ConfigError, ConfigResult, FrameSink, Label, Renderable, Vec3};
use kine_fields::{
    ConductorField, FieldEvaluator, OscillatoryField, PiecewiseCurve, RadialField, ShieldedField,
    SphereSampler, WaveSurface,
};
use rustc_hash::FxHashMap;

/// Typed handle to a named observable
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handle {
    Scalar(Observable<f64>),
    Vector(Observable<Vec3>),
}

/// A built scene ready to play
pub struct Scene {
    name: Option<String>,
    timeline: Timeline,
    handles: FxHashMap<String, Handle>,
    caption: Option<MorphId>,
    script: Vec<Segment>,
}

impl Scene {
    /// Validate `config` and build the scene
    pub fn build(config: &SceneConfig) -> Result<Self> {
        Ok(Builder::new(config)?.finish()?)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }

    pub fn handle(&self, name: &str) -> Option<Handle> {
        self.handles.get(name).copied()
    }

    /// Scalar observable declared under `name`
    pub fn scalar(&self, name: &str) -> Option<Observable<f64>> {
        match self.handle(name)? {
            Handle::Scalar(observable) => Some(observable),
            Handle::Vector(_) => None,
        }
    }

    /// Vector observable declared under `name`
    pub fn vector(&self, name: &str) -> Option<Observable<Vec3>> {
        match self.handle(name)? {
            Handle::Vector(observable) => Some(observable),
            Handle::Scalar(_) => None,
        }
    }

    pub fn caption(&self) -> Option<MorphId> {
        self.caption
    }

    /// Steps not played yet
    pub fn script(&self) -> &[Segment] {
        &self.script
    }

    /// Frames the remaining script will emit
    pub fn expected_frames(&self) -> u64 {
        let clock = self.timeline.clock();
        self.script
            .iter()
            .map(|segment| clock.ticks_for(segment.duration()))
            .sum()
    }

    /// Play the remaining script to the end
    pub fn run<S: FrameSink>(&mut self, sink: &mut S) -> Vec<SegmentSummary> {
        let script = std::mem::take(&mut self.script);
        tracing::debug!(
            scene = self.name.as_deref(),
            steps = script.len(),
            frame_rate = self.timeline.clock().frame_rate(),
            "playing scene"
        );
        self.timeline.run_script(script, sink)
    }
}

struct Builder<'a> {
    config: &'a SceneConfig,
    timeline: Timeline,
    handles: FxHashMap<String, Handle>,
}

impl<'a> Builder<'a> {
    fn new(config: &'a SceneConfig) -> ConfigResult<Self> {
        let timeline = Timeline::new(config.resolved_frame_rate())?;
        config.easing.validate()?;
        Ok(Self {
            config,
            timeline,
            handles: FxHashMap::default(),
        })
    }

    fn finish(mut self) -> ConfigResult<Scene> {
        let config = self.config;
        self.declare_observables()?;
        if let Some(field) = &config.field {
            self.add_field(field)?;
        }
        self.add_surface()?;
        self.add_curve()?;
        let caption = self.add_caption();
        let script = self.build_script(caption)?;

        tracing::debug!(
            scene = config.name.as_deref(),
            observables = self.handles.len(),
            nodes = self.timeline.node_count(),
            steps = script.len(),
            "scene built"
        );
        Ok(Scene {
            name: config.name.clone(),
            timeline: self.timeline,
            handles: self.handles,
            caption,
            script,
        })
    }

    fn declare_observables(&mut self) -> ConfigResult<()> {
        let config = self.config;
        for declared in &config.observables {
            if self.handles.contains_key(&declared.name) {
                return Err(ConfigError::DuplicateObservable(declared.name.clone()));
            }
            let handle = match declared.value {
                ValueConfig::Scalar(v) => {
                    Handle::Scalar(self.timeline.create(ensure_finite("observable value", v)?))
                }
                ValueConfig::Vector(v) => Handle::Vector(
                    self.timeline
                        .create(ensure_finite_vector("observable value", v)?),
                ),
            };
            self.handles.insert(declared.name.clone(), handle);
        }
        Ok(())
    }

    fn scalar(&self, name: &str) -> ConfigResult<Observable<f64>> {
        match self.handles.get(name) {
            Some(Handle::Scalar(observable)) => Ok(*observable),
            Some(Handle::Vector(_)) => Err(ConfigError::MismatchedValue(name.to_string())),
            None => Err(ConfigError::UnknownObservable(name.to_string())),
        }
    }

    fn add_field(&mut self, config: &FieldConfig) -> ConfigResult<()> {
        let field: Box<dyn FieldEvaluator> = match config.kind {
            FieldKind::Radial {
                strength,
                exponent,
                shield_radius,
            } => Box::new(
                RadialField::new(strength)?
                    .with_exponent(exponent)?
                    .with_shield_radius(shield_radius)?,
            ),
            FieldKind::Conductor => Box::new(ConductorField),
            FieldKind::Shielded { shield_radius } => Box::new(ShieldedField::new(shield_radius)?),
            FieldKind::Oscillatory {
                amplitude,
                wavenumber,
                angular_frequency,
                exponent,
                shield_radius,
            } => Box::new(
                OscillatoryField::new(amplitude, wavenumber, angular_frequency)?
                    .with_exponent(exponent)?
                    .with_shield_radius(shield_radius)?,
            ),
        };
        let sampler = SphereSampler::new(config.sample_count, config.radius)?;
        let scale = ensure_finite("arrow_scale", config.arrow_scale)?;
        let color = Color::parse(&config.color)?;

        let mut node = FieldArrowsNode::new(sampler, field, scale, color);
        if let Some(time) = &config.time {
            node = node.with_time(self.scalar(time)?);
        }
        self.timeline.register(node)?;
        Ok(())
    }

    fn add_surface(&mut self) -> ConfigResult<()> {
        let Some(config) = &self.config.surface else {
            return Ok(());
        };
        let surface = WaveSurface::new(config.resolution, config.extent)?.with_wave(
            config.amplitude,
            config.wavenumber,
            config.angular_frequency,
        )?;
        let mut node = SurfaceNode::new(surface, Color::parse(&config.color)?);
        if let Some(time) = &config.time {
            node = node.with_time(self.scalar(time)?);
        }
        self.timeline.register(node)?;
        Ok(())
    }

    fn add_curve(&mut self) -> ConfigResult<()> {
        let Some(config) = &self.config.curve else {
            return Ok(());
        };
        let curve = PiecewiseCurve::new(config.breakpoints.clone())?;
        let tracker = self.scalar(&config.tracker)?;
        let color = Color::parse(&config.dot_color)?;
        let radius = ensure_positive("dot_radius", config.dot_radius)?;

        self.timeline
            .register(CurveTrackerNode::new(tracker, curve.clone(), radius, color))?;
        if config.readout {
            self.timeline.register(
                ReadoutNode::new(tracker, curve).with_labels(&config.x_label, &config.y_label),
            )?;
        }
        Ok(())
    }

    /// The caption morph exists if any caption is configured
    fn add_caption(&mut self) -> Option<MorphId> {
        let captioned = self.config.caption.is_some()
            || self.config.script.iter().any(|step| step.caption().is_some());
        if !captioned {
            return None;
        }
        let initial = match &self.config.caption {
            Some(text) => caption_label(text),
            None => Renderable::Empty,
        };
        Some(self.timeline.create_morph(initial))
    }

    fn build_script(&self, caption: Option<MorphId>) -> ConfigResult<Vec<Segment>> {
        self.config
            .script
            .iter()
            .enumerate()
            .map(|(index, step)| self.build_step(index, step, caption))
            .collect()
    }

    fn build_step(
        &self,
        index: usize,
        step: &StepConfig,
        caption: Option<MorphId>,
    ) -> ConfigResult<Segment> {
        let duration = ensure_finite("duration", step.duration())?;
        if duration < 0.0 {
            return Err(ConfigError::NonPositive {
                name: "duration",
                value: duration,
            });
        }

        match step {
            StepConfig::Wait { .. } => Ok(Segment::wait(duration)),
            StepConfig::Play {
                tweens,
                easing,
                caption: text,
                ..
            } => {
                let easing = easing.unwrap_or(self.config.easing);
                easing.validate()?;
                let mut segment = Segment::play(duration)
                    .with_easing(easing)
                    .with_label(format!("step {index}"));
                for tween in tweens {
                    let id = self.tween_target(&tween.observable, tween.target)?;
                    segment = segment.tween_value(id, tween.target.into());
                }
                if let (Some(text), Some(morph)) = (text, caption) {
                    segment = segment.morph(morph, caption_label(text));
                }
                Ok(segment)
            }
        }
    }

    /// Observable id for a tween, checking the target kind matches
    fn tween_target(&self, name: &str, target: ValueConfig) -> ConfigResult<ObservableId> {
        let handle = self
            .handles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownObservable(name.to_string()))?;
        match (handle, target) {
            (Handle::Scalar(observable), ValueConfig::Scalar(v)) => {
                ensure_finite("tween target", v)?;
                Ok(observable.id())
            }
            (Handle::Vector(observable), ValueConfig::Vector(v)) => {
                ensure_finite_vector("tween target", v)?;
                Ok(observable.id())
            }
            _ => Err(ConfigError::MismatchedValue(name.to_string())),
        }
    }
}

fn ensure_finite_vector(name: &'static str, v: Vec3) -> ConfigResult<Vec3> {
    for component in v.to_array() {
        ensure_finite(name, component)?;
    }
    Ok(v)
}

fn caption_label(text: &str) -> Renderable {
    Renderable::Label(Label::new(text).with_anchor(Anchor::Top))
}

impl SceneConfig {
    /// Validate and build the scene this config describes
    pub fn build(&self) -> Result<Scene> {
        Scene::build(self)
    }
}
