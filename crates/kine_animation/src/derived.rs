//! Derived nodes
//!
//! A derived node turns the current observable values into a fresh
//! [`Renderable`]. Nodes never own observables and cannot mutate them:
//! [`DerivedNode::recompute`] only receives a read-only [`Scope`].

use crate::observable::{Animatable, Observable, ObservableId, ObservableStore};
use kine_core::Renderable;
use slotmap::new_key_type;
use smallvec::SmallVec;
use std::cell::RefCell;

new_key_type! {
    /// Identity of a node registered with a timeline
    pub struct NodeId;
}

/// Observables a node declares it reads
pub type Dependencies = SmallVec<[ObservableId; 4]>;

/// Read-only view of one tick
///
/// Every node recomputed during a tick sees the same `now` and the same
/// observable values.
pub struct Scope<'a> {
    store: &'a ObservableStore,
    now: f64,
    tick: u64,
    declared: &'a [ObservableId],
    undeclared: RefCell<Dependencies>,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(
        store: &'a ObservableStore,
        now: f64,
        tick: u64,
        declared: &'a [ObservableId],
    ) -> Self {
        Self {
            store,
            now,
            tick,
            declared,
            undeclared: RefCell::new(Dependencies::new()),
        }
    }

    /// Observables read without being declared, each listed once
    pub(crate) fn into_undeclared(self) -> Dependencies {
        self.undeclared.into_inner()
    }

    /// Clock time of the tick in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Current value of an observable.
    ///
    /// Falls back to `T::default()` for a handle that does not belong to this
    /// timeline, so recompute stays total. Undeclared reads are still
    /// answered and are reported by the timeline.
    pub fn get<T: Animatable>(&self, observable: Observable<T>) -> T {
        let id = observable.id();
        if !self.declared.contains(&id) {
            let mut undeclared = self.undeclared.borrow_mut();
            if !undeclared.contains(&id) {
                undeclared.push(id);
            }
        }
        self.store
            .get(id)
            .and_then(T::from_value)
            .unwrap_or_default()
    }
}

/// A visual element recomputed from observables every tick
pub trait DerivedNode {
    /// Observables read by [`DerivedNode::recompute`]
    fn dependencies(&self) -> Dependencies;

    /// Build this tick's renderable. Must be pure given the scope and must
    /// not fail; domain edge cases resolve to the evaluators' clamps.
    fn recompute(&self, scope: &Scope<'_>) -> Renderable;

    /// Short name used in logs
    fn name(&self) -> &str {
        "node"
    }
}

/// A node backed by a closure
pub struct FnNode<F> {
    name: String,
    dependencies: Dependencies,
    compute: F,
}

impl<F> FnNode<F>
where
    F: Fn(&Scope<'_>) -> Renderable,
{
    pub fn new(
        name: impl Into<String>,
        dependencies: impl IntoIterator<Item = ObservableId>,
        compute: F,
    ) -> Self {
        Self {
            name: name.into(),
            dependencies: dependencies.into_iter().collect(),
            compute,
        }
    }
}

impl<F> DerivedNode for FnNode<F>
where
    F: Fn(&Scope<'_>) -> Renderable,
{
    fn dependencies(&self) -> Dependencies {
        self.dependencies.clone()
    }

    fn recompute(&self, scope: &Scope<'_>) -> Renderable {
        (self.compute)(scope)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observable::Value;
    use kine_core::{Label, Vec3};

    #[test]
    fn test_scope_reads_typed_values() {
        let mut store = ObservableStore::new();
        let x = Observable::<f64>::from_id(store.insert(Value::Scalar(3.5)));
        let p = Observable::<Vec3>::from_id(store.insert(Value::Vector(Vec3::Y)));
        let declared = [x.id(), p.id()];
        let scope = Scope::new(&store, 1.25, 7, &declared);

        assert_eq!(scope.get(x), 3.5);
        assert_eq!(scope.get(p), Vec3::Y);
        assert_eq!(scope.now(), 1.25);
        assert_eq!(scope.tick(), 7);
    }

    #[test]
    fn test_scope_collects_undeclared_reads_once() {
        let mut store = ObservableStore::new();
        let x = Observable::<f64>::from_id(store.insert(Value::Scalar(1.0)));
        let y = Observable::<f64>::from_id(store.insert(Value::Scalar(2.0)));
        let declared = [x.id()];
        let scope = Scope::new(&store, 0.0, 0, &declared);

        assert_eq!(scope.get(x), 1.0);
        assert_eq!(scope.get(y), 2.0);
        assert_eq!(scope.get(y), 2.0);
        assert_eq!(scope.into_undeclared().as_slice(), &[y.id()]);
    }

    #[test]
    fn test_mismatched_handle_reads_default() {
        let mut store = ObservableStore::new();
        let id = store.insert(Value::Vector(Vec3::ONE));
        let wrong = Observable::<f64>::from_id(id);
        let declared = [id];
        let scope = Scope::new(&store, 0.0, 0, &declared);
        assert_eq!(scope.get(wrong), 0.0);
    }

    #[test]
    fn test_fn_node_recomputes_from_scope() {
        let mut store = ObservableStore::new();
        let x = Observable::<f64>::from_id(store.insert(Value::Scalar(2.0)));
        let node = FnNode::new("double", [x.id()], move |scope: &Scope<'_>| {
            Renderable::Label(Label::new(format!("{}", scope.get(x) * 2.0)))
        });

        let deps = node.dependencies();
        let scope = Scope::new(&store, 0.0, 0, &deps);
        assert_eq!(node.recompute(&scope).text(), Some("4"));
        assert_eq!(node.name(), "double");
    }
}
