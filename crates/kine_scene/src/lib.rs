//! kine Scenes
//!
//! Concrete derived nodes (field arrows, curve tracker, readout, surface),
//! the serde scene configuration, the scene builder and the built-in
//! presets.
//!
//! # Example
//!
//! ```rust
//! use kine_core::InMemorySink;
//! use kine_scene::presets;
//!
//! let mut scene = presets::payout_curve().build().unwrap();
//! let expected = scene.expected_frames();
//!
//! let mut sink = InMemorySink::default();
//! scene.run(&mut sink);
//! assert_eq!(sink.frames().len() as u64, expected);
//! ```

pub mod config;
pub mod error;
pub mod nodes;
pub mod presets;
pub mod scene;

pub use config::{
    CurveConfig, FieldConfig, FieldKind, ObservableConfig, Quality, SceneConfig, StepConfig,
    SurfaceConfig, TweenConfig, ValueConfig,
};
pub use error::{Result, SceneError};
pub use nodes::{format_thousands, CurveTrackerNode, FieldArrowsNode, ReadoutNode, SurfaceNode};
pub use scene::{Handle, Scene};
