//! kine Animation System
//!
//! Observables, tweens, derived nodes and tick-driven timelines.
//!
//! # Features
//!
//! - **Observables**: typed scalar/vector cells with at most one active tween
//! - **Easing**: pluggable per segment, linear by default
//! - **Derived nodes**: pure recompute of a renderable from observable values
//! - **Timelines**: sequential segments, parallel tweens, a two-phase tick
//!   (advance everything, then recompute everything)
//!
//! # Example
//!
//! ```rust
//! use kine_animation::{Easing, FnNode, Scope, Segment, Timeline};
//! use kine_core::{InMemorySink, Label, Renderable};
//!
//! let mut timeline = Timeline::new(10.0).unwrap();
//! let x = timeline.create(0.0);
//! timeline
//!     .register(FnNode::new("readout", [x.id()], move |scope: &Scope<'_>| {
//!         Renderable::Label(Label::new(format!("{:.0}", scope.get(x))))
//!     }))
//!     .unwrap();
//!
//! let mut sink = InMemorySink::default();
//! timeline.run_segment(Segment::play(1.0).tween(x, 100.0).with_easing(Easing::Linear), &mut sink);
//!
//! assert_eq!(sink.frames().len(), 10);
//! assert_eq!(sink.last().unwrap().items[0].text(), Some("100"));
//! ```

pub mod clock;
pub mod derived;
pub mod easing;
pub mod morph;
pub mod observable;
pub mod segment;
pub mod timeline;

pub use clock::Clock;
pub use derived::{Dependencies, DerivedNode, FnNode, NodeId, Scope};
pub use easing::Easing;
pub use morph::{Morph, MorphId};
pub use observable::{Animatable, Observable, ObservableId, ObservableStore, Tween, Value};
pub use segment::{Segment, SegmentState, SegmentSummary, TweenSpec};
pub use timeline::Timeline;
