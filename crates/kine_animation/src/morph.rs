//! Discrete renderable transitions
//!
//! A morph swaps one renderable for another over a duration (a caption
//! changing its text, for example). Unlike a [`Tween`](crate::Tween) nothing
//! is interpolated numerically; the renderer receives both ends plus the
//! eased progress and decides how to blend them.

use crate::easing::Easing;
use kine_core::Renderable;
use slotmap::new_key_type;

new_key_type! {
    /// Identity of a morph owned by a timeline
    pub struct MorphId;
}

#[derive(Clone, Debug)]
struct Transition {
    from: Renderable,
    to: Renderable,
    start: f64,
    duration: f64,
    easing: Easing,
    progress: f64,
}

/// Timeline-owned renderable that changes through discrete transitions
#[derive(Clone, Debug)]
pub struct Morph {
    current: Renderable,
    transition: Option<Transition>,
}

impl Morph {
    pub fn new(initial: Renderable) -> Self {
        Self {
            current: initial,
            transition: None,
        }
    }

    /// The settled renderable (the target while a transition runs)
    pub fn current(&self) -> &Renderable {
        match &self.transition {
            Some(transition) => &transition.to,
            None => &self.current,
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Start a transition at `now`.
    ///
    /// An in-flight transition is settled first, so the new one always
    /// starts from the previous target. A non-positive duration swaps
    /// immediately.
    pub fn transition_to(&mut self, target: Renderable, now: f64, duration: f64, easing: Easing) {
        self.settle();
        if !duration.is_finite() || duration <= 0.0 {
            self.current = target;
            return;
        }
        let from = std::mem::replace(&mut self.current, Renderable::Empty);
        self.transition = Some(Transition {
            from,
            to: target,
            start: now,
            duration,
            easing,
            progress: 0.0,
        });
    }

    /// Advance to `now`. Returns true while still transitioning.
    pub fn advance(&mut self, now: f64) -> bool {
        let Some(transition) = self.transition.as_mut() else {
            return false;
        };
        let raw = (now - transition.start) / transition.duration;
        let raw = if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) };
        if raw >= 1.0 {
            self.settle();
            return false;
        }
        transition.progress = transition.easing.apply(raw);
        true
    }

    /// Jump to the end of any running transition.
    pub fn settle(&mut self) {
        if let Some(transition) = self.transition.take() {
            self.current = transition.to;
        }
    }

    /// Renderable for the current tick
    pub fn render(&self) -> Renderable {
        match &self.transition {
            Some(transition) => Renderable::Morph {
                from: Box::new(transition.from.clone()),
                to: Box::new(transition.to.clone()),
                progress: transition.progress,
            },
            None => self.current.clone(),
        }
    }
}
