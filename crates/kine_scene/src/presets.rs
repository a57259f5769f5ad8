//! Built-in scenes
//!
//! Each preset returns a plain [`SceneConfig`], so callers can tweak it
//! (quality, colors, timings) before building.

use crate::config::{
    CurveConfig, FieldConfig, FieldKind, ObservableConfig, SceneConfig, StepConfig, SurfaceConfig,
    TweenConfig, ValueConfig,
};
use kine_animation::Easing;

/// Sales-to-payout breakpoints: floor, target and ceiling
pub const PAYOUT_BREAKPOINTS: [(f64, f64); 3] = [
    (151_898.0, 40.0),
    (189_873.0, 100.0),
    (227_848.0, 160.0),
];

/// Sales value the payout animation starts from
pub const START_SALES: f64 = 130_000.0;

fn play(duration: f64) -> StepConfig {
    StepConfig::Play {
        duration,
        tweens: Vec::new(),
        easing: None,
        caption: None,
    }
}

fn caption(duration: f64, text: &str) -> StepConfig {
    StepConfig::Play {
        duration,
        tweens: Vec::new(),
        easing: None,
        caption: Some(text.to_string()),
    }
}

fn wait(duration: f64) -> StepConfig {
    StepConfig::Wait { duration }
}

fn tween_sales(duration: f64, target: f64, text: Option<&str>) -> StepConfig {
    StepConfig::Play {
        duration,
        tweens: vec![TweenConfig {
            observable: "sales".to_string(),
            target: ValueConfig::Scalar(target),
        }],
        easing: None,
        caption: text.map(str::to_string),
    }
}

fn scalar(name: &str, value: f64) -> ObservableConfig {
    ObservableConfig {
        name: name.to_string(),
        value: ValueConfig::Scalar(value),
    }
}

fn field(kind: FieldKind, sample_count: usize, radius: f64, arrow_scale: f64, color: &str) -> FieldConfig {
    FieldConfig {
        kind,
        sample_count,
        radius,
        arrow_scale,
        color: color.to_string(),
        time: None,
    }
}

/// A dot walking the payout curve through its four regimes while the
/// readout tracks sales and payout
pub fn payout_curve() -> SceneConfig {
    let [floor, target, ceiling] = PAYOUT_BREAKPOINTS;
    SceneConfig {
        name: Some("payout curve".to_string()),
        quality: "480".to_string(),
        easing: Easing::Linear,
        observables: vec![scalar("sales", START_SALES)],
        curve: Some(CurveConfig {
            breakpoints: PAYOUT_BREAKPOINTS.to_vec(),
            tracker: "sales".to_string(),
            dot_color: "white".to_string(),
            dot_radius: 0.05,
            readout: true,
            x_label: "net sales".to_string(),
            y_label: "payout".to_string(),
        }),
        script: vec![
            caption(0.2, "below floor → payout locked at 40%"),
            tween_sales(1.5, floor.0 - 1.0, None),
            tween_sales(4.5, target.0, Some("80%→100% → straight-line to 100%")),
            tween_sales(4.5, ceiling.0, Some("100%→120% → straight-line to 160%")),
            tween_sales(1.5, 250_000.0, Some("above ceiling → payout capped at 160%")),
            wait(1.2),
        ],
        ..SceneConfig::default()
    }
}

/// Field arrows around a conductor occupying `z < 0`
pub fn conductor_field() -> SceneConfig {
    SceneConfig {
        name: Some("conductor field".to_string()),
        field: Some(field(FieldKind::Conductor, 500, 3.0, 0.5, "blue")),
        script: vec![
            caption(1.0, "Electric Field Around a Conductor"),
            wait(1.0),
            play(1.0),
            wait(1.0),
            play(1.0),
            wait(1.0),
            caption(1.0, "E = 0 Inside the Conductor"),
            wait(4.0),
            wait(5.0),
            caption(1.0, "Maxwell Dictates the Behavior of Electric Fields"),
            wait(3.0),
        ],
        ..SceneConfig::default()
    }
}

/// Magnetic field expelled from a superconducting core
pub fn superconductor_field() -> SceneConfig {
    SceneConfig {
        name: Some("superconductor field".to_string()),
        field: Some(field(
            FieldKind::Shielded { shield_radius: 0.1 },
            1000,
            4.0,
            2.0,
            "red",
        )),
        script: vec![
            caption(1.0, "Meissner Effect in a Superconductor"),
            wait(1.0),
            play(1.0),
            wait(1.0),
            play(1.0),
            wait(1.0),
            caption(1.0, "B = 0 Inside"),
            wait(4.0),
            wait(3.0),
            caption(1.0, "Superconductors Expel Magnetic Fields"),
            wait(3.0),
        ],
        ..SceneConfig::default()
    }
}

/// An outgoing wave: arrows follow the clock while the surface phase is
/// driven by the `phase` observable
pub fn oscillating_field() -> SceneConfig {
    SceneConfig {
        name: Some("oscillating field".to_string()),
        quality: "720".to_string(),
        observables: vec![scalar("phase", 0.0)],
        field: Some(field(
            FieldKind::Oscillatory {
                amplitude: 1.0,
                wavenumber: 2.0,
                angular_frequency: 3.0,
                exponent: 1.0,
                shield_radius: 0.2,
            },
            400,
            2.5,
            0.8,
            "yellow",
        )),
        surface: Some(SurfaceConfig {
            resolution: 30,
            extent: 3.0,
            amplitude: 0.5,
            wavenumber: 2.0,
            angular_frequency: 2.0,
            color: "blue".to_string(),
            time: Some("phase".to_string()),
        }),
        script: vec![
            caption(1.0, "Outgoing Spherical Wave"),
            StepConfig::Play {
                duration: 8.0,
                tweens: vec![TweenConfig {
                    observable: "phase".to_string(),
                    target: ValueConfig::Scalar(8.0),
                }],
                easing: Some(Easing::Linear),
                caption: None,
            },
            wait(2.0),
        ],
        ..SceneConfig::default()
    }
}

/// Every preset by name
pub fn all() -> Vec<(&'static str, SceneConfig)> {
    vec![
        ("payout_curve", payout_curve()),
        ("conductor_field", conductor_field()),
        ("superconductor_field", superconductor_field()),
        ("oscillating_field", oscillating_field()),
    ]
}
