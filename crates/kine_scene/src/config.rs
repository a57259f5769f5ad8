//! Scene configuration
//!
//! A scene is described by a flat TOML or JSON document. Parsing only checks
//! shape; everything else (monotone breakpoints, positive counts, known
//! observable names, colors, easings) is validated when the scene is built.
//!
//! ```toml
//! quality = "480"
//! easing = "linear"
//!
//! [[observables]]
//! name = "sales"
//! value = 130000
//!
//! [curve]
//! breakpoints = [[151898, 40], [189873, 100], [227848, 160]]
//! tracker = "sales"
//!
//! [[script]]
//! type = "play"
//! duration = 1.5
//! tweens = [{ observable = "sales", target = 151897 }]
//!
//! [[script]]
//! type = "wait"
//! duration = 1.2
//! ```

use crate::error::{Result, SceneError};
use kine_animation::{Easing, Value};
use kine_core::Vec3;
use serde::Deserialize;
use std::path::Path;

/// Output quality preset
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Quality {
    /// 480p, 15 fps
    Low,
    /// 720p, 30 fps
    Medium,
    /// 1080p, 60 fps
    #[default]
    High,
    /// 2160p, 60 fps
    Ultra,
}

impl Quality {
    /// Parse a quality flag. Unknown flags fall back to 1080 with a warning.
    pub fn parse(flag: &str) -> Self {
        match flag.trim().to_ascii_lowercase().as_str() {
            "480" | "480p" => Quality::Low,
            "720" | "720p" => Quality::Medium,
            "1080" | "1080p" => Quality::High,
            "4k" | "2160" | "2160p" => Quality::Ultra,
            other => {
                tracing::warn!(quality = other, "unknown quality, using 1080");
                Quality::High
            }
        }
    }

    pub fn frame_rate(&self) -> f64 {
        match self {
            Quality::Low => 15.0,
            Quality::Medium => 30.0,
            Quality::High | Quality::Ultra => 60.0,
        }
    }

    /// Pixel height of the output
    pub fn height(&self) -> u32 {
        match self {
            Quality::Low => 480,
            Quality::Medium => 720,
            Quality::High => 1080,
            Quality::Ultra => 2160,
        }
    }
}

/// Top-level scene configuration
#[derive(Clone, Debug, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub name: Option<String>,
    /// `"480"`, `"720"`, `"1080"` or `"4k"`
    #[serde(default = "default_quality")]
    pub quality: String,
    /// Overrides the frame rate implied by `quality`
    #[serde(default)]
    pub frame_rate: Option<f64>,
    /// Easing for steps that do not name their own
    #[serde(default)]
    pub easing: Easing,
    #[serde(default)]
    pub observables: Vec<ObservableConfig>,
    /// Caption shown before the first captioned step
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub curve: Option<CurveConfig>,
    #[serde(default)]
    pub field: Option<FieldConfig>,
    #[serde(default)]
    pub surface: Option<SurfaceConfig>,
    #[serde(default)]
    pub script: Vec<StepConfig>,
}

fn default_quality() -> String {
    "1080".to_string()
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            name: None,
            quality: default_quality(),
            frame_rate: None,
            easing: Easing::default(),
            observables: Vec::new(),
            caption: None,
            curve: None,
            field: None,
            surface: None,
            script: Vec::new(),
        }
    }
}

impl SceneConfig {
    pub fn from_toml(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a `.json` file as JSON and anything else as TOML
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&raw)
        } else {
            Self::from_toml(&raw)
        }
    }

    pub fn quality(&self) -> Quality {
        Quality::parse(&self.quality)
    }

    /// Explicit frame rate, or the one implied by the quality flag
    pub fn resolved_frame_rate(&self) -> f64 {
        self.frame_rate
            .unwrap_or_else(|| self.quality().frame_rate())
    }
}

/// A scalar or a `[x, y, z]` vector
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ValueConfig {
    Scalar(f64),
    Vector(Vec3),
}

impl From<ValueConfig> for Value {
    fn from(value: ValueConfig) -> Self {
        match value {
            ValueConfig::Scalar(v) => Value::Scalar(v),
            ValueConfig::Vector(v) => Value::Vector(v),
        }
    }
}

/// A named observable and its initial value
#[derive(Clone, Debug, Deserialize)]
pub struct ObservableConfig {
    pub name: String,
    pub value: ValueConfig,
}

/// A curve with a tracking dot and optional readout labels
#[derive(Clone, Debug, Deserialize)]
pub struct CurveConfig {
    /// `(x, y)` pairs, x strictly increasing, y non-decreasing
    pub breakpoints: Vec<(f64, f64)>,
    /// Scalar observable that drives the dot
    pub tracker: String,
    #[serde(default = "default_dot_color")]
    pub dot_color: String,
    #[serde(default = "default_dot_radius")]
    pub dot_radius: f64,
    #[serde(default = "default_true")]
    pub readout: bool,
    #[serde(default = "default_x_label")]
    pub x_label: String,
    #[serde(default = "default_y_label")]
    pub y_label: String,
}

fn default_dot_color() -> String {
    "white".to_string()
}

fn default_dot_radius() -> f64 {
    0.05
}

fn default_true() -> bool {
    true
}

fn default_x_label() -> String {
    "net sales".to_string()
}

fn default_y_label() -> String {
    "payout".to_string()
}

/// Field variant and its parameters
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Radial {
        #[serde(default = "default_strength")]
        strength: f64,
        #[serde(default = "default_radial_exponent")]
        exponent: f64,
        #[serde(default)]
        shield_radius: f64,
    },
    Conductor,
    Shielded {
        #[serde(default = "default_shield_radius")]
        shield_radius: f64,
    },
    Oscillatory {
        #[serde(default = "default_strength")]
        amplitude: f64,
        #[serde(default = "default_strength")]
        wavenumber: f64,
        #[serde(default = "default_strength")]
        angular_frequency: f64,
        #[serde(default = "default_strength")]
        exponent: f64,
        #[serde(default)]
        shield_radius: f64,
    },
}

fn default_strength() -> f64 {
    1.0
}

fn default_radial_exponent() -> f64 {
    2.0
}

fn default_shield_radius() -> f64 {
    0.1
}

/// Arrows sampled on a sphere
#[derive(Clone, Debug, Deserialize)]
pub struct FieldConfig {
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default = "default_sample_count")]
    pub sample_count: usize,
    #[serde(default = "default_field_radius")]
    pub radius: f64,
    #[serde(default = "default_arrow_scale")]
    pub arrow_scale: f64,
    #[serde(default = "default_field_color")]
    pub color: String,
    /// Scalar observable used as field time instead of the clock
    #[serde(default)]
    pub time: Option<String>,
}

fn default_sample_count() -> usize {
    500
}

fn default_field_radius() -> f64 {
    3.0
}

fn default_arrow_scale() -> f64 {
    0.5
}

fn default_field_color() -> String {
    "blue".to_string()
}

/// A travelling-wave surface
#[derive(Clone, Debug, Deserialize)]
pub struct SurfaceConfig {
    #[serde(default = "default_resolution")]
    pub resolution: usize,
    #[serde(default = "default_field_radius")]
    pub extent: f64,
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,
    #[serde(default = "default_wave")]
    pub wavenumber: f64,
    #[serde(default = "default_wave")]
    pub angular_frequency: f64,
    #[serde(default = "default_field_color")]
    pub color: String,
    #[serde(default)]
    pub time: Option<String>,
}

fn default_resolution() -> usize {
    30
}

fn default_amplitude() -> f64 {
    0.5
}

fn default_wave() -> f64 {
    2.0
}

/// A tween inside a `play` step
#[derive(Clone, Debug, Deserialize)]
pub struct TweenConfig {
    pub observable: String,
    pub target: ValueConfig,
}

/// One step of the script
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepConfig {
    Play {
        duration: f64,
        #[serde(default)]
        tweens: Vec<TweenConfig>,
        #[serde(default)]
        easing: Option<Easing>,
        /// Morph the caption to this text over the step
        #[serde(default)]
        caption: Option<String>,
    },
    Wait {
        duration: f64,
    },
}

impl StepConfig {
    pub fn duration(&self) -> f64 {
        match self {
            StepConfig::Play { duration, .. } | StepConfig::Wait { duration } => *duration,
        }
    }

    pub fn caption(&self) -> Option<&str> {
        match self {
            StepConfig::Play { caption, .. } => caption.as_deref(),
            StepConfig::Wait { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_flags() {
        assert_eq!(Quality::parse("480"), Quality::Low);
        assert_eq!(Quality::parse("720"), Quality::Medium);
        assert_eq!(Quality::parse("1080"), Quality::High);
        assert_eq!(Quality::parse("4K"), Quality::Ultra);
        assert_eq!(Quality::parse("potato"), Quality::High);
        assert_eq!(Quality::Low.frame_rate(), 15.0);
        assert_eq!(Quality::Medium.frame_rate(), 30.0);
        assert_eq!(Quality::Ultra.frame_rate(), 60.0);
        assert_eq!(Quality::Ultra.height(), 2160);
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = SceneConfig::from_toml("").unwrap();
        assert_eq!(config.quality(), Quality::High);
        assert_eq!(config.resolved_frame_rate(), 60.0);
        assert_eq!(config.easing, Easing::Linear);
        assert!(config.script.is_empty());
    }

    #[test]
    fn test_parse_toml_scene() {
        let config = SceneConfig::from_toml(
            r#"
            quality = "480"
            easing = "smooth"

            [[observables]]
            name = "sales"
            value = 130000

            [[observables]]
            name = "probe"
            value = [0.0, 1.0, 2.0]

            [curve]
            breakpoints = [[151898, 40], [189873, 100], [227848, 160]]
            tracker = "sales"

            [field]
            kind = "shielded"
            sample_count = 1000
            radius = 4

            [[script]]
            type = "play"
            duration = 1.5
            caption = "below floor"
            tweens = [{ observable = "sales", target = 151897 }]

            [[script]]
            type = "wait"
            duration = 1.2
            "#,
        )
        .unwrap();

        assert_eq!(config.resolved_frame_rate(), 15.0);
        assert_eq!(config.easing, Easing::Smooth);
        assert_eq!(config.observables[0].value, ValueConfig::Scalar(130_000.0));
        assert_eq!(
            config.observables[1].value,
            ValueConfig::Vector(Vec3::new(0.0, 1.0, 2.0))
        );

        let curve = config.curve.as_ref().unwrap();
        assert_eq!(curve.breakpoints[1], (189_873.0, 100.0));
        assert_eq!(curve.dot_color, "white");
        assert_eq!(curve.dot_radius, 0.05);
        assert!(curve.readout);

        let field = config.field.as_ref().unwrap();
        assert_eq!(field.kind, FieldKind::Shielded { shield_radius: 0.1 });
        assert_eq!(field.sample_count, 1000);
        assert_eq!(field.radius, 4.0);
        assert_eq!(field.arrow_scale, 0.5);

        assert_eq!(config.script.len(), 2);
        assert_eq!(config.script[0].caption(), Some("below floor"));
        assert_eq!(config.script[1].duration(), 1.2);
    }

    #[test]
    fn test_parse_json_scene() {
        let config = SceneConfig::from_json(
            r#"{
                "frame_rate": 24,
                "field": { "kind": "oscillatory", "amplitude": 2.0, "time": "t" },
                "script": [
                    { "type": "play", "duration": 2.0,
                      "easing": { "cubic_bezier": [0.4, 0.0, 0.2, 1.0] },
                      "tweens": [{ "observable": "t", "target": 6.28 }] }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.resolved_frame_rate(), 24.0);
        let field = config.field.unwrap();
        assert!(matches!(field.kind, FieldKind::Oscillatory { amplitude, .. } if amplitude == 2.0));
        assert_eq!(field.time.as_deref(), Some("t"));
        match &config.script[0] {
            StepConfig::Play { easing, tweens, .. } => {
                assert_eq!(*easing, Some(Easing::CubicBezier(0.4, 0.0, 0.2, 1.0)));
                assert_eq!(tweens[0].target, ValueConfig::Scalar(6.28));
            }
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn test_malformed_documents_are_parse_errors() {
        assert!(matches!(
            SceneConfig::from_toml("quality = ["),
            Err(SceneError::Toml(_))
        ));
        assert!(matches!(
            SceneConfig::from_json(r#"{ "script": [{ "type": "dance" }] }"#),
            Err(SceneError::Json(_))
        ));
        assert!(matches!(
            SceneConfig::from_path(Path::new("/nonexistent/scene.toml")),
            Err(SceneError::Io { .. })
        ));
    }
}
