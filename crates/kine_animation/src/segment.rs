//! Animation segments
//!
//! A segment is one `play` or `wait` step of a scene script. All of its
//! tweens and morphs start together when the segment begins and share its
//! duration and easing.

use crate::easing::Easing;
use crate::morph::MorphId;
use crate::observable::{Animatable, Observable, ObservableId, Value};
use kine_core::Renderable;

/// Lifecycle of a segment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SegmentState {
    #[default]
    Pending,
    Running,
    Complete,
}

/// A tween scheduled when the segment begins
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenSpec {
    pub observable: ObservableId,
    pub target: Value,
}

/// A morph started when the segment begins
#[derive(Clone, Debug, PartialEq)]
pub struct MorphSpec {
    pub morph: MorphId,
    pub target: Renderable,
}

/// One step of a script
#[derive(Clone, Debug)]
pub struct Segment {
    label: Option<String>,
    duration: f64,
    easing: Easing,
    tweens: Vec<TweenSpec>,
    morphs: Vec<MorphSpec>,
    state: SegmentState,
}

impl Segment {
    /// A segment that animates (add tweens with [`Segment::tween`])
    pub fn play(duration: f64) -> Self {
        Self {
            label: None,
            duration,
            easing: Easing::Linear,
            tweens: Vec::new(),
            morphs: Vec::new(),
            state: SegmentState::Pending,
        }
    }

    /// A segment that only lets time pass
    pub fn wait(duration: f64) -> Self {
        Self::play(duration).with_label("wait")
    }

    /// Builder: tween `observable` to `target` over the segment
    pub fn tween<T: Animatable>(mut self, observable: Observable<T>, target: T) -> Self {
        self.tweens.push(TweenSpec {
            observable: observable.id(),
            target: target.into_value(),
        });
        self
    }

    /// Builder: add an untyped tween
    pub fn tween_value(mut self, observable: ObservableId, target: Value) -> Self {
        self.tweens.push(TweenSpec { observable, target });
        self
    }

    /// Builder: morph to `target` over the segment
    pub fn morph(mut self, morph: MorphId, target: Renderable) -> Self {
        self.morphs.push(MorphSpec { morph, target });
        self
    }

    /// Builder: easing shared by every tween and morph of the segment
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn tweens(&self) -> &[TweenSpec] {
        &self.tweens
    }

    pub fn morphs(&self) -> &[MorphSpec] {
        &self.morphs
    }

    pub fn state(&self) -> SegmentState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: SegmentState) {
        self.state = state;
    }
}

/// Record of a segment the timeline has finished
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentSummary {
    pub label: Option<String>,
    /// Clock time when the segment began
    pub start: f64,
    /// Clock time when the segment completed
    pub end: f64,
    /// Frames emitted while the segment ran
    pub frames: u64,
    /// True if the segment was stopped before its duration elapsed
    pub cancelled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observable::ObservableStore;

    #[test]
    fn test_builder_collects_specs() {
        let mut store = ObservableStore::new();
        let sales = Observable::<f64>::from_id(store.insert(Value::Scalar(130_000.0)));
        let segment = Segment::play(1.5)
            .tween(sales, 151_897.0)
            .with_easing(Easing::Smooth)
            .with_label("phase 1");

        assert_eq!(segment.state(), SegmentState::Pending);
        assert_eq!(segment.duration(), 1.5);
        assert_eq!(segment.easing(), Easing::Smooth);
        assert_eq!(segment.label(), Some("phase 1"));
        assert_eq!(
            segment.tweens(),
            &[TweenSpec {
                observable: sales.id(),
                target: Value::Scalar(151_897.0),
            }]
        );
    }

    #[test]
    fn test_wait_has_no_tweens() {
        let segment = Segment::wait(1.2);
        assert!(segment.tweens().is_empty());
        assert!(segment.morphs().is_empty());
        assert_eq!(segment.label(), Some("wait"));
    }
}
