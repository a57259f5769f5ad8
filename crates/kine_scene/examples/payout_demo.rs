//! Payout Curve Demo
//!
//! Plays the payout preset and logs one line per caption change plus a
//! summary per script step, with the dot position and readout at the end of
//! each step.
//!
//! Run with: RUST_LOG=kine_animation=debug cargo run -p kine_scene --example payout_demo

use anyhow::Result;
use kine_core::{Frame, FrameSink, Renderable};
use kine_scene::presets;
use tracing_subscriber::EnvFilter;

/// Logs caption changes and keeps the latest frame
#[derive(Default)]
struct LoggingSink {
    caption: Option<String>,
    last: Option<Frame>,
}

impl FrameSink for LoggingSink {
    fn submit(&mut self, frame: Frame) {
        let caption = frame.items.last().and_then(Renderable::text).map(str::to_owned);
        if caption != self.caption {
            tracing::info!(time = frame.time, caption = caption.as_deref(), "caption");
            self.caption = caption;
        }
        self.last = Some(frame);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut scene = presets::payout_curve().build()?;
    let steps: Vec<_> = scene.script().to_vec();
    tracing::info!(
        steps = steps.len(),
        frames = scene.expected_frames(),
        "playing payout curve"
    );

    let mut sink = LoggingSink::default();
    for step in steps {
        let summary = scene.timeline_mut().run_segment(step, &mut sink);
        let Some(frame) = sink.last.as_ref() else {
            continue;
        };
        let readout: Vec<&str> = match frame.items.get(1) {
            Some(Renderable::Group(labels)) => labels.iter().filter_map(Renderable::text).collect(),
            _ => Vec::new(),
        };
        tracing::info!(
            step = summary.label.as_deref(),
            end = summary.end,
            frames = summary.frames,
            readout = ?readout,
            "step complete"
        );
    }
    Ok(())
}
