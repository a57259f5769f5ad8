//! Timeline orchestration
//!
//! The timeline owns the clock, every observable, every morph and the
//! ordered list of registered derived nodes. Each tick runs in two phases:
//!
//! 1. advance every active tween and morph to the tick time
//! 2. recompute every registered node against the updated values and hand
//!    the resulting [`Frame`] to the sink
//!
//! Phase 2 only borrows the timeline immutably, so no node can observe a
//! half-advanced tick or write to an observable.

use crate::clock::Clock;
use crate::derived::{Dependencies, DerivedNode, NodeId, Scope};
use crate::easing::Easing;
use crate::morph::{Morph, MorphId};
use crate::observable::{Animatable, Observable, ObservableStore};
use crate::segment::{Segment, SegmentState, SegmentSummary};
use kine_core::{ConfigError, ConfigResult, Frame, FrameSink, Renderable};
use slotmap::SlotMap;
use std::cell::RefCell;

struct Registration {
    node: Box<dyn DerivedNode>,
    dependencies: Dependencies,
    /// Undeclared reads already logged for this node
    reported: RefCell<Dependencies>,
}

/// Frame slot in registration order
#[derive(Clone, Copy, Debug)]
enum Entry {
    Node(NodeId),
    Morph(MorphId),
}

struct ActiveSegment {
    segment: Segment,
    start: f64,
    total_ticks: u64,
    ticks: u64,
}

impl ActiveSegment {
    fn end_time(&self) -> f64 {
        let duration = self.segment.duration();
        if duration.is_finite() && duration > 0.0 {
            self.start + duration
        } else {
            self.start
        }
    }

    fn is_last_tick(&self) -> bool {
        self.ticks >= self.total_ticks
    }
}

/// Owner of the clock, the observables and the derived nodes of one scene
pub struct Timeline {
    clock: Clock,
    observables: ObservableStore,
    nodes: SlotMap<NodeId, Registration>,
    morphs: SlotMap<MorphId, Morph>,
    order: Vec<Entry>,
    active: Option<ActiveSegment>,
    history: Vec<SegmentSummary>,
    /// Free-running ticks are counted from here when no segment runs
    idle_anchor: f64,
    idle_ticks: u64,
}

impl Timeline {
    pub fn new(frame_rate: f64) -> ConfigResult<Self> {
        Ok(Self::with_clock(Clock::new(frame_rate)?))
    }

    fn with_clock(clock: Clock) -> Self {
        Self {
            clock,
            observables: ObservableStore::new(),
            nodes: SlotMap::with_key(),
            morphs: SlotMap::with_key(),
            order: Vec::new(),
            active: None,
            history: Vec::new(),
            idle_anchor: 0.0,
            idle_ticks: 0,
        }
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Current clock time in seconds
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    // ========================================================================
    // Observables
    // ========================================================================

    /// Create an observable holding `initial`
    pub fn create<T: Animatable>(&mut self, initial: T) -> Observable<T> {
        Observable::from_id(self.observables.insert(initial.into_value()))
    }

    /// Current value, valid between ticks
    pub fn get<T: Animatable>(&self, observable: Observable<T>) -> T {
        self.observables
            .get(observable.id())
            .and_then(T::from_value)
            .unwrap_or_default()
    }

    /// Instantaneous set; cancels any active tween. Nothing is recomputed
    /// until the next tick.
    pub fn set<T: Animatable>(&mut self, observable: Observable<T>, value: T) {
        self.observables.set(observable.id(), value.into_value());
    }

    /// Tween from the current value to `target`, starting now.
    pub fn tween_to<T: Animatable>(
        &mut self,
        observable: Observable<T>,
        target: T,
        duration: f64,
        easing: Easing,
    ) {
        let now = self.clock.now();
        self.observables
            .tween_to(observable.id(), target.into_value(), now, duration, easing);
    }

    pub fn is_tweening<T>(&self, observable: Observable<T>) -> bool {
        self.observables.is_tweening(observable.id())
    }

    pub fn active_tweens(&self) -> usize {
        self.observables.active_tweens()
    }

    pub fn observables(&self) -> &ObservableStore {
        &self.observables
    }

    // ========================================================================
    // Nodes and morphs
    // ========================================================================

    /// Register a derived node. Its dependencies must already exist.
    pub fn register<N: DerivedNode + 'static>(&mut self, node: N) -> ConfigResult<NodeId> {
        let dependencies = node.dependencies();
        if let Some(missing) = dependencies
            .iter()
            .find(|id| !self.observables.contains(**id))
        {
            return Err(ConfigError::UnknownObservable(format!(
                "{missing:?} (read by {})",
                node.name()
            )));
        }
        tracing::debug!(
            node = node.name(),
            dependencies = dependencies.len(),
            "registered derived node"
        );
        let id = self.nodes.insert(Registration {
            node: Box::new(node),
            dependencies,
            reported: RefCell::new(Dependencies::new()),
        });
        self.order.push(Entry::Node(id));
        Ok(id)
    }

    /// Create a morph that shows `initial` until its first transition
    pub fn create_morph(&mut self, initial: Renderable) -> MorphId {
        let id = self.morphs.insert(Morph::new(initial));
        self.order.push(Entry::Morph(id));
        id
    }

    /// Start a morph transition now
    pub fn morph_to(
        &mut self,
        id: MorphId,
        target: Renderable,
        duration: f64,
        easing: Easing,
    ) -> bool {
        let now = self.clock.now();
        match self.morphs.get_mut(id) {
            Some(morph) => {
                morph.transition_to(target, now, duration, easing);
                true
            }
            None => false,
        }
    }

    pub fn morph(&self, id: MorphId) -> Option<&Morph> {
        self.morphs.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Recompute a single node against the current values
    pub fn render(&self, id: NodeId) -> Option<Renderable> {
        let registration = self.nodes.get(id)?;
        Some(self.recompute(registration))
    }

    /// Observables the node has read without declaring them
    pub fn undeclared_reads(&self, id: NodeId) -> Dependencies {
        self.nodes
            .get(id)
            .map(|registration| registration.reported.borrow().clone())
            .unwrap_or_default()
    }

    fn recompute(&self, registration: &Registration) -> Renderable {
        let scope = Scope::new(
            &self.observables,
            self.clock.now(),
            self.clock.tick(),
            &registration.dependencies,
        );
        let renderable = registration.node.recompute(&scope);
        let undeclared = scope.into_undeclared();
        if !undeclared.is_empty() {
            let mut reported = registration.reported.borrow_mut();
            for id in undeclared {
                if !reported.contains(&id) {
                    tracing::warn!(
                        node = registration.node.name(),
                        ?id,
                        "node read an observable it did not declare"
                    );
                    reported.push(id);
                }
            }
        }
        renderable
    }

    /// Recompute every node and morph at the current tick without advancing.
    ///
    /// Calling this twice in a row returns identical frames.
    pub fn frame(&self) -> Frame {
        let mut frame = Frame::new(self.clock.tick(), self.clock.now());
        for entry in &self.order {
            match *entry {
                Entry::Node(id) => {
                    if let Some(registration) = self.nodes.get(id) {
                        frame.push(self.recompute(registration));
                    }
                }
                Entry::Morph(id) => {
                    if let Some(morph) = self.morphs.get(id) {
                        frame.push(morph.render());
                    }
                }
            }
        }
        frame
    }

    // ========================================================================
    // Segments
    // ========================================================================

    /// State of the running segment, if any
    pub fn segment_state(&self) -> Option<SegmentState> {
        self.active.as_ref().map(|active| active.segment.state())
    }

    /// Segments completed so far, oldest first
    pub fn history(&self) -> &[SegmentSummary] {
        &self.history
    }

    /// Start a segment: schedule its tweens and morphs at the current time.
    ///
    /// A segment that is still running is finished first (its tweens jump to
    /// their targets).
    pub fn begin(&mut self, mut segment: Segment) {
        if let Some(previous) = self.active.take() {
            tracing::warn!(
                label = previous.segment.label(),
                "segment begun while another was running; finishing the previous one"
            );
            self.observables.finish_all();
            self.settle_morphs();
            self.record(previous, true);
        }

        let now = self.clock.now();
        let duration = segment.duration();
        let easing = segment.easing();
        for spec in segment.tweens() {
            if !self
                .observables
                .tween_to(spec.observable, spec.target, now, duration, easing)
            {
                tracing::warn!(observable = ?spec.observable, "segment tweens an unknown observable");
            }
        }
        for spec in segment.morphs() {
            match self.morphs.get_mut(spec.morph) {
                Some(morph) => morph.transition_to(spec.target.clone(), now, duration, easing),
                None => tracing::warn!(morph = ?spec.morph, "segment morphs an unknown morph"),
            }
        }

        let total_ticks = self.clock.ticks_for(duration);
        tracing::debug!(
            label = segment.label(),
            duration,
            ticks = total_ticks,
            tweens = segment.tweens().len(),
            morphs = segment.morphs().len(),
            "segment started"
        );
        segment.set_state(SegmentState::Running);
        self.reset_idle_anchor();
        self.active = Some(ActiveSegment {
            segment,
            start: now,
            total_ticks,
            ticks: 0,
        });
    }

    /// Advance one tick and emit one frame.
    ///
    /// With a running segment, tick `k` lands at `start + k / fps` and the
    /// final tick lands exactly on the segment end. Without one the clock
    /// free-runs by one frame. Returns the state of the segment after the
    /// tick (`Complete` when there is none).
    pub fn tick<S: FrameSink>(&mut self, sink: &mut S) -> SegmentState {
        let (now, last_tick) = match self.active.as_mut() {
            Some(active) => {
                active.ticks += 1;
                if active.is_last_tick() {
                    (active.end_time(), true)
                } else {
                    (self.clock.time_after(active.start, active.ticks), false)
                }
            }
            None => {
                self.idle_ticks += 1;
                (self.clock.time_after(self.idle_anchor, self.idle_ticks), false)
            }
        };
        self.clock.step_to(now);
        let now = self.clock.now();

        // Phase 1: every tween and morph reaches `now`
        let still_active = self.observables.advance(now);
        for morph in self.morphs.values_mut() {
            morph.advance(now);
        }
        if last_tick {
            self.pin_segment_targets();
        }

        // Phase 2: recompute against a consistent snapshot
        let frame = self.frame();
        tracing::trace!(
            tick = frame.tick,
            time = now,
            tweens = still_active,
            items = frame.items.len(),
            "tick"
        );
        sink.submit(frame);

        if last_tick {
            if let Some(active) = self.active.take() {
                self.record(active, false);
            }
            return SegmentState::Complete;
        }
        self.segment_state().unwrap_or(SegmentState::Complete)
    }

    /// Stop the running segment early.
    ///
    /// Every active tween and morph jumps to its target, and one final frame
    /// is emitted at the current time. Returns false if nothing was running.
    pub fn cancel<S: FrameSink>(&mut self, sink: &mut S) -> bool {
        let Some(mut active) = self.active.take() else {
            return false;
        };
        let finished = self.observables.finish_all();
        self.settle_morphs();

        let now = self.clock.now();
        self.clock.step_to(now);
        active.ticks += 1;
        sink.submit(self.frame());

        tracing::debug!(
            label = active.segment.label(),
            finished_tweens = finished,
            "segment cancelled"
        );
        self.record(active, true);
        true
    }

    /// Run a segment to completion. Returns its summary.
    pub fn run_segment<S: FrameSink>(&mut self, segment: Segment, sink: &mut S) -> SegmentSummary {
        self.begin(segment);
        while self.tick(sink) != SegmentState::Complete {}
        self.history
            .last()
            .cloned()
            .unwrap_or_else(|| SegmentSummary {
                label: None,
                start: self.clock.now(),
                end: self.clock.now(),
                frames: 0,
                cancelled: false,
            })
    }

    /// Let `duration` seconds pass with no new tweens. Nodes still recompute
    /// every tick, so clock-driven nodes keep moving.
    pub fn wait<S: FrameSink>(&mut self, duration: f64, sink: &mut S) -> SegmentSummary {
        self.run_segment(Segment::wait(duration), sink)
    }

    /// Run segments one after another
    pub fn run_script<S, I>(&mut self, segments: I, sink: &mut S) -> Vec<SegmentSummary>
    where
        S: FrameSink,
        I: IntoIterator<Item = Segment>,
    {
        segments
            .into_iter()
            .map(|segment| self.run_segment(segment, sink))
            .collect()
    }

    /// Snap the running segment's own tweens and morphs onto their targets
    /// so the segment ends exactly on them regardless of rounding in
    /// `(end - start) / duration`.
    fn pin_segment_targets(&mut self) {
        let Some(active) = self.active.as_ref() else {
            return;
        };
        for spec in active.segment.tweens() {
            let owned_by_segment = self
                .observables
                .tween(spec.observable)
                .is_some_and(|tween| tween.start() == active.start);
            if owned_by_segment {
                self.observables.finish(spec.observable);
            }
        }
        for spec in active.segment.morphs() {
            if let Some(morph) = self.morphs.get_mut(spec.morph) {
                morph.settle();
            }
        }
    }

    fn settle_morphs(&mut self) {
        for morph in self.morphs.values_mut() {
            morph.settle();
        }
    }

    fn reset_idle_anchor(&mut self) {
        self.idle_anchor = self.clock.now();
        self.idle_ticks = 0;
    }

    fn record(&mut self, mut active: ActiveSegment, cancelled: bool) {
        active.segment.set_state(SegmentState::Complete);
        self.reset_idle_anchor();
        let summary = SegmentSummary {
            label: active.segment.label().map(str::to_owned),
            start: active.start,
            end: self.clock.now(),
            frames: active.ticks,
            cancelled,
        };
        tracing::debug!(
            label = summary.label.as_deref(),
            frames = summary.frames,
            end = summary.end,
            cancelled,
            "segment complete"
        );
        self.history.push(summary);
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::with_clock(Clock::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derived::FnNode;
    use kine_core::{InMemorySink, Label, NullSink, Vec3};

    fn scalar_label(timeline: &mut Timeline, value: Observable<f64>) -> NodeId {
        timeline
            .register(FnNode::new("label", [value.id()], move |scope: &Scope<'_>| {
                Renderable::Label(Label::new(format!("{:.3}", scope.get(value))))
            }))
            .unwrap()
    }

    #[test]
    fn test_tween_sampled_at_midpoint_and_end() {
        let mut timeline = Timeline::new(10.0).unwrap();
        let x = timeline.create(0.0);
        timeline.tween_to(x, 100.0, 4.0, Easing::Linear);

        let mut sink = NullSink;
        for _ in 0..20 {
            timeline.tick(&mut sink);
        }
        assert_eq!(timeline.now(), 2.0);
        assert!((timeline.get(x) - 50.0).abs() < 1e-9);

        for _ in 0..20 {
            timeline.tick(&mut sink);
        }
        assert_eq!(timeline.get(x), 100.0);
        assert!(!timeline.is_tweening(x));

        for _ in 0..5 {
            timeline.tick(&mut sink);
        }
        assert_eq!(timeline.get(x), 100.0);
    }

    #[test]
    fn test_segment_lifecycle() {
        let mut timeline = Timeline::new(4.0).unwrap();
        let x = timeline.create(0.0);
        let mut sink = InMemorySink::default();

        let segment = Segment::play(1.0).tween(x, 8.0);
        assert_eq!(segment.state(), SegmentState::Pending);

        timeline.begin(segment);
        assert_eq!(timeline.segment_state(), Some(SegmentState::Running));
        assert_eq!(timeline.tick(&mut sink), SegmentState::Running);
        assert_eq!(timeline.tick(&mut sink), SegmentState::Running);
        assert_eq!(timeline.tick(&mut sink), SegmentState::Running);
        assert_eq!(timeline.tick(&mut sink), SegmentState::Complete);
        assert_eq!(timeline.segment_state(), None);

        assert_eq!(sink.frames().len(), 4);
        assert_eq!(timeline.get(x), 8.0);
        assert_eq!(timeline.history().len(), 1);
        assert_eq!(timeline.history()[0].frames, 4);
        assert!(!timeline.history()[0].cancelled);
    }

    #[test]
    fn test_segment_ends_exactly_on_target_with_awkward_times() {
        let mut timeline = Timeline::new(15.0).unwrap();
        let sales = timeline.create(130_000.0);
        let mut sink = NullSink;

        timeline.run_segment(Segment::play(1.5).tween(sales, 151_897.0), &mut sink);
        assert_eq!(timeline.get(sales), 151_897.0);
        timeline.run_segment(
            Segment::play(4.5)
                .tween(sales, 189_873.0)
                .with_easing(Easing::Smooth),
            &mut sink,
        );
        assert_eq!(timeline.get(sales), 189_873.0);
        assert_eq!(timeline.now(), 6.0);
    }

    #[test]
    fn test_parallel_tweens_are_never_observed_half_updated() {
        let mut timeline = Timeline::new(30.0).unwrap();
        let a = timeline.create(0.0);
        let b = timeline.create(0.0);
        timeline
            .register(FnNode::new("pair", [a.id(), b.id()], move |scope: &Scope<'_>| {
                Renderable::Points(vec![Vec3::new(scope.get(a), scope.get(b), 0.0)])
            }))
            .unwrap();

        let mut sink = InMemorySink::default();
        timeline.run_segment(Segment::play(2.0).tween(a, 10.0).tween(b, 10.0), &mut sink);

        for frame in sink.frames() {
            let Renderable::Points(points) = &frame.items[0] else {
                panic!("expected points");
            };
            assert_eq!(points[0].x, points[0].y, "tick {} saw a torn update", frame.tick);
        }
        let last = sink.last().unwrap();
        assert_eq!(last.items[0], Renderable::Points(vec![Vec3::new(10.0, 10.0, 0.0)]));
    }

    #[test]
    fn test_frame_is_idempotent_between_ticks() {
        let mut timeline = Timeline::new(10.0).unwrap();
        let x = timeline.create(1.0);
        scalar_label(&mut timeline, x);
        timeline.tween_to(x, 2.0, 1.0, Easing::EaseInOutQuad);
        timeline.tick(&mut NullSink);

        assert_eq!(timeline.frame(), timeline.frame());
    }

    #[test]
    fn test_set_does_not_recompute_until_tick() {
        let mut timeline = Timeline::new(10.0).unwrap();
        let x = timeline.create(1.0);
        scalar_label(&mut timeline, x);
        let mut sink = InMemorySink::default();

        timeline.tick(&mut sink);
        timeline.set(x, 5.0);
        assert_eq!(sink.frames().len(), 1);
        assert_eq!(sink.frames()[0].items[0].text(), Some("1.000"));

        timeline.tick(&mut sink);
        assert_eq!(sink.frames()[1].items[0].text(), Some("5.000"));
    }

    #[test]
    fn test_wait_keeps_recomputing_clock_driven_nodes() {
        let mut timeline = Timeline::new(10.0).unwrap();
        timeline
            .register(FnNode::new("clock", [], |scope: &Scope<'_>| {
                Renderable::Label(Label::new(format!("{:.1}", scope.now())))
            }))
            .unwrap();

        let mut sink = InMemorySink::default();
        let summary = timeline.wait(0.5, &mut sink);

        assert_eq!(summary.frames, 5);
        let texts: Vec<_> = sink
            .frames()
            .iter()
            .map(|f| f.items[0].text().unwrap().to_owned())
            .collect();
        assert_eq!(texts, ["0.1", "0.2", "0.3", "0.4", "0.5"]);
    }

    #[test]
    fn test_undeclared_read_answered_and_reported_once() {
        let mut timeline = Timeline::new(10.0).unwrap();
        let x = timeline.create(4.0);
        let id = timeline
            .register(FnNode::new("sloppy", [], move |scope: &Scope<'_>| {
                Renderable::Label(Label::new(format!("{}", scope.get(x) + scope.get(x))))
            }))
            .unwrap();
        assert!(timeline.undeclared_reads(id).is_empty());

        let mut sink = InMemorySink::default();
        timeline.wait(1.0, &mut sink);

        assert_eq!(sink.frames().len(), 10);
        assert_eq!(sink.last().unwrap().items[0].text(), Some("8"));
        assert_eq!(timeline.undeclared_reads(id).as_slice(), &[x.id()]);
    }

    #[test]
    fn test_cancel_jumps_to_targets() {
        let mut timeline = Timeline::new(10.0).unwrap();
        let x = timeline.create(0.0);
        let caption = timeline.create_morph(Renderable::Label(Label::new("before")));
        scalar_label(&mut timeline, x);
        let mut sink = InMemorySink::default();

        timeline.begin(
            Segment::play(3.0)
                .tween(x, 30.0)
                .morph(caption, Renderable::Label(Label::new("after"))),
        );
        timeline.tick(&mut sink);
        timeline.tick(&mut sink);
        assert!(timeline.cancel(&mut sink));

        assert_eq!(timeline.get(x), 30.0);
        assert_eq!(timeline.active_tweens(), 0);
        let last = sink.last().unwrap();
        assert_eq!(last.items[0], Renderable::Label(Label::new("after")));
        assert_eq!(last.items[1].text(), Some("30.000"));
        assert!(timeline.history()[0].cancelled);
        assert!(!timeline.cancel(&mut sink));
    }

    #[test]
    fn test_zero_duration_segment_emits_one_frame() {
        let mut timeline = Timeline::new(10.0).unwrap();
        let x = timeline.create(0.0);
        let mut sink = InMemorySink::default();

        let summary = timeline.run_segment(Segment::play(0.0).tween(x, 3.0), &mut sink);
        assert_eq!(summary.frames, 1);
        assert_eq!(sink.frames().len(), 1);
        assert_eq!(timeline.get(x), 3.0);
        assert_eq!(timeline.now(), 0.0);
    }

    #[test]
    fn test_register_rejects_foreign_observable() {
        let mut other = Timeline::default();
        let foreign = other.create(0.0);
        other.create(1.0);

        let mut timeline = Timeline::default();
        let result = timeline.register(FnNode::new("x", [foreign.id()], |_: &Scope<'_>| {
            Renderable::Empty
        }));
        assert!(matches!(result, Err(ConfigError::UnknownObservable(_))));
    }

    #[test]
    fn test_morph_reported_during_segment() {
        let mut timeline = Timeline::new(4.0).unwrap();
        let caption = timeline.create_morph(Renderable::Label(Label::new("a")));
        let mut sink = InMemorySink::default();

        timeline.run_segment(
            Segment::play(1.0).morph(caption, Renderable::Label(Label::new("b"))),
            &mut sink,
        );

        let progress: Vec<_> = sink
            .frames()
            .iter()
            .map(|frame| match &frame.items[0] {
                Renderable::Morph { progress, .. } => *progress,
                Renderable::Label(_) => 1.0,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(progress, [0.25, 0.5, 0.75, 1.0]);
        assert_eq!(sink.last().unwrap().items[0], Renderable::Label(Label::new("b")));
    }
}
