//! kine Core Types
//!
//! This crate provides the primitives shared by every layer of the kine
//! diagram engine:
//!
//! - **Math**: a small `f64` 3-vector used for positions and field vectors
//! - **Color**: RGBA colors parsed from the hex strings used in scene configs
//! - **Renderables**: immutable per-tick output handed to the external renderer
//! - **Errors**: configuration errors raised when a scene is built
//!
//! # Example
//!
//! ```rust
//! use kine_core::{Frame, FrameSink, InMemorySink, Renderable, Vec3};
//!
//! let mut sink = InMemorySink::default();
//! let mut frame = Frame::new(1, 1.0 / 15.0);
//! frame.push(Renderable::Points(vec![Vec3::new(0.0, 0.0, 1.0)]));
//! sink.submit(frame);
//!
//! assert_eq!(sink.frames().len(), 1);
//! ```

pub mod color;
pub mod error;
pub mod math;
pub mod render;

pub use color::Color;
pub use error::{ConfigError, ConfigResult};
pub use math::Vec3;
pub use render::{
    Anchor, Arrow, Frame, FrameSink, InMemorySink, Label, Mesh, NullSink, Renderable,
};
