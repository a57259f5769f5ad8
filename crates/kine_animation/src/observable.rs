//! Observables and tweens
//!
//! An observable is a driven scalar or vector cell. Its value changes only
//! through an explicit [`ObservableStore::set`] or while a [`Tween`] is being
//! advanced by the timeline. At most one tween is active per observable;
//! scheduling another replaces it.

use crate::easing::Easing;
use kine_core::Vec3;
use serde::Serialize;
use slotmap::{new_key_type, SlotMap};
use std::fmt;
use std::marker::PhantomData;

new_key_type! {
    /// Untyped identity of an observable inside a store
    pub struct ObservableId;
}

/// Value held by an observable
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(f64),
    Vector(Vec3),
}

impl Value {
    /// Component-wise interpolation. Mismatched kinds snap to `target`.
    pub fn lerp(self, target: Value, t: f64) -> Value {
        match (self, target) {
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(a + (b - a) * t),
            (Value::Vector(a), Value::Vector(b)) => Value::Vector(a.lerp(b, t)),
            (_, target) => target,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(v) => Some(*v),
            Value::Vector(_) => None,
        }
    }

    pub fn as_vector(&self) -> Option<Vec3> {
        match self {
            Value::Vector(v) => Some(*v),
            Value::Scalar(_) => None,
        }
    }
}

/// Types that can live in an observable
pub trait Animatable: Copy + Default + PartialEq + fmt::Debug + 'static {
    fn into_value(self) -> Value;
    fn from_value(value: Value) -> Option<Self>;
}

impl Animatable for f64 {
    fn into_value(self) -> Value {
        Value::Scalar(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        value.as_scalar()
    }
}

impl Animatable for Vec3 {
    fn into_value(self) -> Value {
        Value::Vector(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        value.as_vector()
    }
}

/// Typed handle to an observable.
///
/// Handles are plain keys: copying one never copies or shares the value, and
/// the observable does not know who holds handles to it.
pub struct Observable<T> {
    id: ObservableId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Observable<T> {
    pub(crate) fn from_id(id: ObservableId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> ObservableId {
        self.id
    }
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Observable<T> {}

impl<T> PartialEq for Observable<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Observable<T> {}

impl<T> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Observable").field(&self.id).finish()
    }
}

/// A scheduled interpolation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    start_value: Value,
    target: Value,
    /// Clock time at which the tween was scheduled
    start: f64,
    duration: f64,
    easing: Easing,
}

impl Tween {
    pub fn new(start_value: Value, target: Value, start: f64, duration: f64, easing: Easing) -> Self {
        Self {
            start_value,
            target,
            start,
            duration,
            easing,
        }
    }

    pub fn target(&self) -> Value {
        self.target
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    /// Linear progress at `now`, clamped to [0, 1]
    pub fn progress(&self, now: f64) -> f64 {
        let raw = (now - self.start) / self.duration;
        if raw.is_nan() {
            return 0.0;
        }
        raw.clamp(0.0, 1.0)
    }

    /// Interpolated value at `now`. Exactly the target once progress is 1.
    pub fn sample(&self, now: f64) -> Value {
        let progress = self.progress(now);
        if progress >= 1.0 {
            return self.target;
        }
        self.start_value.lerp(self.target, self.easing.apply(progress))
    }
}

struct Cell {
    value: Value,
    tween: Option<Tween>,
}

/// Storage for every observable of one timeline
#[derive(Default)]
pub struct ObservableStore {
    cells: SlotMap<ObservableId, Cell>,
}

impl ObservableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: Value) -> ObservableId {
        self.cells.insert(Cell { value, tween: None })
    }

    pub fn contains(&self, id: ObservableId) -> bool {
        self.cells.contains_key(id)
    }

    pub fn get(&self, id: ObservableId) -> Option<Value> {
        self.cells.get(id).map(|cell| cell.value)
    }

    /// Instantaneous set. Cancels any active tween.
    pub fn set(&mut self, id: ObservableId, value: Value) -> bool {
        match self.cells.get_mut(id) {
            Some(cell) => {
                cell.value = value;
                cell.tween = None;
                true
            }
            None => false,
        }
    }

    /// Schedule a tween starting at `now` from the current value.
    ///
    /// Replaces any active tween. A non-positive or non-finite duration
    /// degrades to an instantaneous set.
    pub fn tween_to(
        &mut self,
        id: ObservableId,
        target: Value,
        now: f64,
        duration: f64,
        easing: Easing,
    ) -> bool {
        if !duration.is_finite() || duration <= 0.0 {
            return self.set(id, target);
        }
        let Some(cell) = self.cells.get_mut(id) else {
            return false;
        };
        if let Some(previous) = cell.tween.take() {
            tracing::trace!(
                ?id,
                previous_target = ?previous.target(),
                "replacing active tween"
            );
        }
        cell.tween = Some(Tween::new(cell.value, target, now, duration, easing));
        true
    }

    pub fn tween(&self, id: ObservableId) -> Option<&Tween> {
        self.cells.get(id).and_then(|cell| cell.tween.as_ref())
    }

    pub fn is_tweening(&self, id: ObservableId) -> bool {
        self.tween(id).is_some()
    }

    /// Advance every active tween to `now`, retiring finished ones.
    ///
    /// Returns the number of tweens still active afterwards.
    pub fn advance(&mut self, now: f64) -> usize {
        let mut active = 0;
        for (_, cell) in self.cells.iter_mut() {
            let Some(tween) = cell.tween else {
                continue;
            };
            cell.value = tween.sample(now);
            if tween.progress(now) >= 1.0 {
                cell.tween = None;
            } else {
                active += 1;
            }
        }
        active
    }

    /// Jump one observable's tween to its target and retire it.
    pub fn finish(&mut self, id: ObservableId) -> bool {
        let Some(cell) = self.cells.get_mut(id) else {
            return false;
        };
        match cell.tween.take() {
            Some(tween) => {
                cell.value = tween.target();
                true
            }
            None => false,
        }
    }

    /// Jump every active tween to its target and retire it.
    pub fn finish_all(&mut self) -> usize {
        let mut finished = 0;
        for (_, cell) in self.cells.iter_mut() {
            if let Some(tween) = cell.tween.take() {
                cell.value = tween.target();
                finished += 1;
            }
        }
        finished
    }

    pub fn active_tweens(&self) -> usize {
        self.cells.values().filter(|cell| cell.tween.is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_tween_midpoint_and_pin() {
        let mut store = ObservableStore::new();
        let id = store.insert(Value::Scalar(0.0));
        store.tween_to(id, Value::Scalar(100.0), 0.0, 4.0, Easing::Linear);

        store.advance(2.0);
        let mid = store.get(id).and_then(|v| v.as_scalar()).unwrap();
        assert!((mid - 50.0).abs() < 1e-9);
        assert!(store.is_tweening(id));

        store.advance(4.0);
        assert_eq!(store.get(id), Some(Value::Scalar(100.0)));
        assert!(!store.is_tweening(id));

        store.advance(9.0);
        assert_eq!(store.get(id), Some(Value::Scalar(100.0)));
    }

    #[test]
    fn test_new_tween_replaces_active_one() {
        let mut store = ObservableStore::new();
        let id = store.insert(Value::Scalar(0.0));
        store.tween_to(id, Value::Scalar(10.0), 0.0, 1.0, Easing::Linear);
        store.advance(0.5);

        // Starts from the current value (5.0), not from the old start
        store.tween_to(id, Value::Scalar(-5.0), 0.5, 1.0, Easing::Linear);
        assert_eq!(store.active_tweens(), 1);
        store.advance(1.0);
        let v = store.get(id).and_then(|v| v.as_scalar()).unwrap();
        assert!(v.abs() < 1e-9);
        store.advance(1.5);
        assert_eq!(store.get(id), Some(Value::Scalar(-5.0)));
    }

    #[test]
    fn test_non_positive_duration_sets_instantly() {
        let mut store = ObservableStore::new();
        let id = store.insert(Value::Scalar(1.0));
        store.tween_to(id, Value::Scalar(7.0), 0.0, 0.0, Easing::Linear);
        assert_eq!(store.get(id), Some(Value::Scalar(7.0)));
        assert!(!store.is_tweening(id));

        store.tween_to(id, Value::Scalar(3.0), 0.0, -2.0, Easing::Linear);
        assert_eq!(store.get(id), Some(Value::Scalar(3.0)));

        store.tween_to(id, Value::Scalar(4.0), 0.0, f64::NAN, Easing::Linear);
        assert_eq!(store.get(id), Some(Value::Scalar(4.0)));
    }

    #[test]
    fn test_set_cancels_tween() {
        let mut store = ObservableStore::new();
        let id = store.insert(Value::Scalar(0.0));
        store.tween_to(id, Value::Scalar(10.0), 0.0, 1.0, Easing::Linear);
        store.set(id, Value::Scalar(2.0));
        store.advance(1.0);
        assert_eq!(store.get(id), Some(Value::Scalar(2.0)));
    }

    #[test]
    fn test_vector_tween_is_component_wise() {
        let mut store = ObservableStore::new();
        let id = store.insert(Value::Vector(Vec3::ZERO));
        store.tween_to(
            id,
            Value::Vector(Vec3::new(2.0, -4.0, 8.0)),
            0.0,
            2.0,
            Easing::Linear,
        );
        store.advance(1.0);
        assert_eq!(store.get(id), Some(Value::Vector(Vec3::new(1.0, -2.0, 4.0))));
    }

    #[test]
    fn test_finish_all_pins_targets() {
        let mut store = ObservableStore::new();
        let a = store.insert(Value::Scalar(0.0));
        let b = store.insert(Value::Scalar(0.0));
        store.tween_to(a, Value::Scalar(1.0), 0.0, 10.0, Easing::EaseInOutCubic);
        store.tween_to(b, Value::Scalar(2.0), 0.0, 10.0, Easing::Smooth);
        store.advance(3.0);

        assert_eq!(store.finish_all(), 2);
        assert_eq!(store.get(a), Some(Value::Scalar(1.0)));
        assert_eq!(store.get(b), Some(Value::Scalar(2.0)));
        assert_eq!(store.active_tweens(), 0);
    }

    #[test]
    fn test_mismatched_lerp_snaps_to_target() {
        let v = Value::Scalar(1.0).lerp(Value::Vector(Vec3::X), 0.3);
        assert_eq!(v, Value::Vector(Vec3::X));
    }
}
