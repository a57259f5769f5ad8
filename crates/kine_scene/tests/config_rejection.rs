//! Invalid scene configurations are rejected when the scene is built

use kine_core::ConfigError;
use kine_scene::{presets, SceneConfig, SceneError};

fn build_error(toml: &str) -> ConfigError {
    let config = SceneConfig::from_toml(toml).unwrap();
    match config.build() {
        Err(SceneError::Config(error)) => error,
        Err(other) => panic!("expected a config error, got {other}"),
        Ok(_) => panic!("scene should have been rejected"),
    }
}

const SALES: &str = r#"
[[observables]]
name = "sales"
value = 130000
"#;

#[test]
fn test_rejects_unordered_breakpoints() {
    let error = build_error(&format!(
        "{SALES}\n[curve]\nbreakpoints = [[189873, 100], [151898, 40]]\ntracker = \"sales\"\n"
    ));
    assert!(matches!(error, ConfigError::UnorderedBreakpoints { index: 1, .. }));
}

#[test]
fn test_rejects_decreasing_breakpoints() {
    let error = build_error(&format!(
        "{SALES}\n[curve]\nbreakpoints = [[1, 100], [2, 40]]\ntracker = \"sales\"\n"
    ));
    assert!(matches!(error, ConfigError::DecreasingBreakpoints { .. }));
}

#[test]
fn test_rejects_empty_breakpoints() {
    let error = build_error(&format!(
        "{SALES}\n[curve]\nbreakpoints = []\ntracker = \"sales\"\n"
    ));
    assert_eq!(error, ConfigError::EmptyBreakpoints);
}

#[test]
fn test_rejects_unknown_tracker() {
    let error = build_error(
        "[curve]\nbreakpoints = [[0, 0], [1, 1]]\ntracker = \"revenue\"\n",
    );
    assert_eq!(error, ConfigError::UnknownObservable("revenue".to_string()));
}

#[test]
fn test_rejects_unknown_tween_observable() {
    let error = build_error(&format!(
        "{SALES}\n[[script]]\ntype = \"play\"\nduration = 1.0\ntweens = [{{ observable = \"profit\", target = 1 }}]\n"
    ));
    assert_eq!(error, ConfigError::UnknownObservable("profit".to_string()));
}

#[test]
fn test_rejects_mismatched_tween_target() {
    let error = build_error(&format!(
        "{SALES}\n[[script]]\ntype = \"play\"\nduration = 1.0\ntweens = [{{ observable = \"sales\", target = [1, 2, 3] }}]\n"
    ));
    assert_eq!(error, ConfigError::MismatchedValue("sales".to_string()));
}

#[test]
fn test_rejects_duplicate_observable() {
    let error = build_error(&format!("{SALES}{SALES}"));
    assert_eq!(error, ConfigError::DuplicateObservable("sales".to_string()));
}

#[test]
fn test_rejects_non_positive_counts_and_radii() {
    let error = build_error("[field]\nkind = \"conductor\"\nsample_count = 0\n");
    assert!(matches!(error, ConfigError::NonPositiveCount { .. }));

    let error = build_error("[field]\nkind = \"conductor\"\nradius = -3.0\n");
    assert!(matches!(error, ConfigError::NonPositive { name: "radius", .. }));

    let error = build_error("[field]\nkind = \"shielded\"\nshield_radius = -0.1\n");
    assert!(matches!(error, ConfigError::NonPositive { name: "shield_radius", .. }));

    let error = build_error("[surface]\nresolution = 1\n");
    assert!(matches!(error, ConfigError::NonPositiveCount { .. }));
}

#[test]
fn test_rejects_bad_colors() {
    let error = build_error("[field]\nkind = \"conductor\"\ncolor = \"#12345\"\n");
    assert_eq!(error, ConfigError::InvalidColor("#12345".to_string()));

    let error = build_error(&format!(
        "{SALES}\n[curve]\nbreakpoints = [[0, 0]]\ntracker = \"sales\"\ndot_color = \"mauve-ish\"\n"
    ));
    assert!(matches!(error, ConfigError::InvalidColor(_)));
}

#[test]
fn test_rejects_invalid_bezier_easing() {
    let error = build_error("easing = { cubic_bezier = [1.5, 0.0, 0.2, 1.0] }\n");
    assert!(matches!(error, ConfigError::InvalidEasing(_)));

    let error = build_error(
        "[[script]]\ntype = \"play\"\nduration = 1.0\neasing = { cubic_bezier = [0.2, 0.0, -0.1, 1.0] }\n",
    );
    assert!(matches!(error, ConfigError::InvalidEasing(_)));
}

#[test]
fn test_rejects_bad_frame_rate_and_duration() {
    let error = build_error("frame_rate = 0.0\n");
    assert!(matches!(error, ConfigError::NonPositive { name: "frame_rate", .. }));

    let error = build_error("[[script]]\ntype = \"wait\"\nduration = -1.0\n");
    assert!(matches!(error, ConfigError::NonPositive { name: "duration", .. }));
}

#[test]
fn test_time_observable_must_be_scalar() {
    let error = build_error(
        "[[observables]]\nname = \"t\"\nvalue = [0, 0, 0]\n\n[field]\nkind = \"oscillatory\"\ntime = \"t\"\n",
    );
    assert_eq!(error, ConfigError::MismatchedValue("t".to_string()));
}

#[test]
fn test_unknown_quality_falls_back_to_1080() {
    let mut config = presets::conductor_field();
    config.quality = "8k".to_string();
    let scene = config.build().unwrap();
    assert_eq!(scene.timeline().clock().frame_rate(), 60.0);
}

#[test]
fn test_zero_duration_step_emits_one_frame() {
    let config = SceneConfig::from_toml(&format!(
        "{SALES}\n[[script]]\ntype = \"play\"\nduration = 0\ntweens = [{{ observable = \"sales\", target = 200000 }}]\n"
    ))
    .unwrap();
    let mut scene = config.build().unwrap();
    let sales = scene.scalar("sales").unwrap();
    let mut sink = kine_core::InMemorySink::default();
    let summaries = scene.run(&mut sink);

    assert_eq!(sink.frames().len(), 1);
    assert_eq!(summaries[0].frames, 1);
    assert_eq!(scene.timeline().get(sales), 200_000.0);
}

#[test]
fn test_load_from_json_file() {
    let path = std::env::temp_dir().join(format!("kine-scene-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{ "quality": "480",
             "observables": [{ "name": "x", "value": 0 }],
             "script": [{ "type": "play", "duration": 1.0,
                          "tweens": [{ "observable": "x", "target": 10 }] }] }"#,
    )
    .unwrap();

    let config = SceneConfig::from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let mut scene = config.build().unwrap();
    assert_eq!(scene.expected_frames(), 15);
    let x = scene.scalar("x").unwrap();
    scene.run(&mut kine_core::NullSink);
    assert_eq!(scene.timeline().get(x), 10.0);
}
