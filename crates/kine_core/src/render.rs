//! Renderable primitives and frame delivery
//!
//! Derived nodes produce a fresh [`Renderable`] every tick. The timeline
//! collects them into a [`Frame`] and hands it to a [`FrameSink`], which is the
//! only seam between the engine and the external renderer.

use crate::color::Color;
use crate::math::Vec3;
use serde::Serialize;

/// A directed segment drawn from `origin` to `tip`
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Arrow {
    pub origin: Vec3,
    pub tip: Vec3,
    pub color: Color,
}

impl Arrow {
    pub fn new(origin: Vec3, tip: Vec3, color: Color) -> Self {
        Self { origin, tip, color }
    }

    /// Direction vector from origin to tip
    pub fn direction(&self) -> Vec3 {
        self.tip - self.origin
    }

    pub fn length(&self) -> f64 {
        self.direction().length()
    }
}

/// Where a label is placed relative to the frame.
///
/// Layout itself belongs to the renderer; the anchor only says which slot the
/// label occupies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
}

/// A text-bearing label
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Label {
    pub text: String,
    pub anchor: Anchor,
    pub color: Color,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            anchor: Anchor::default(),
            color: Color::WHITE,
        }
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// A regular grid of vertices, row-major, `rows * cols` long
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Mesh {
    pub rows: usize,
    pub cols: usize,
    pub vertices: Vec<Vec3>,
    pub color: Color,
}

impl Mesh {
    /// Vertex at grid coordinate `(row, col)`
    pub fn vertex(&self, row: usize, col: usize) -> Option<Vec3> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.vertices.get(row * self.cols + col).copied()
    }
}

/// The output of a derived node for one tick
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Renderable {
    /// Nothing to draw this tick
    Empty,
    Points(Vec<Vec3>),
    Arrows(Vec<Arrow>),
    Dot {
        position: Vec3,
        radius: f64,
        color: Color,
    },
    Label(Label),
    Mesh(Mesh),
    /// A discrete transition between two renderables. `progress` is already
    /// eased and lies in [0, 1].
    Morph {
        from: Box<Renderable>,
        to: Box<Renderable>,
        progress: f64,
    },
    Group(Vec<Renderable>),
}

impl Renderable {
    /// Text of a label, or of the target side of a label morph
    pub fn text(&self) -> Option<&str> {
        match self {
            Renderable::Label(label) => Some(&label.text),
            Renderable::Morph { to, .. } => to.text(),
            _ => None,
        }
    }

    /// Number of leaf primitives (points, arrows, dots, labels, meshes)
    pub fn primitive_count(&self) -> usize {
        match self {
            Renderable::Empty => 0,
            Renderable::Points(points) => points.len(),
            Renderable::Arrows(arrows) => arrows.len(),
            Renderable::Dot { .. } | Renderable::Label(_) | Renderable::Mesh(_) => 1,
            Renderable::Morph { from, to, .. } => from.primitive_count().max(to.primitive_count()),
            Renderable::Group(items) => items.iter().map(Renderable::primitive_count).sum(),
        }
    }
}

/// Everything the renderer needs for one tick
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame {
    /// Tick index, counted from the start of the timeline
    pub tick: u64,
    /// Clock time in seconds
    pub time: f64,
    /// Renderables in node registration order
    pub items: Vec<Renderable>,
}

impl Frame {
    pub fn new(tick: u64, time: f64) -> Self {
        Self {
            tick,
            time,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, item: Renderable) {
        self.items.push(item);
    }
}

/// Consumer of frames (the external renderer)
pub trait FrameSink {
    fn submit(&mut self, frame: Frame);
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn submit(&mut self, frame: Frame) {
        (**self).submit(frame);
    }
}

/// Collects every frame in memory
#[derive(Debug, Default)]
pub struct InMemorySink {
    frames: Vec<Frame>,
}

impl InMemorySink {
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl FrameSink for InMemorySink {
    fn submit(&mut self, frame: Frame) {
        self.frames.push(frame);
    }
}

/// Discards every frame
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn submit(&mut self, _frame: Frame) {}
}
