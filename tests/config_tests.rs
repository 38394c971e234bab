//! Integration tests for configuration management

use semester_roadmap::config::{Config, ConfigOverrides};
use semester_roadmap::core::roadmap::anchors::{FULL_ANCHORS, POPUP_ANCHORS};
use semester_roadmap::ViewContext;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a temporary config directory
fn setup_temp_config() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_file = temp_dir.path().join("config.toml");
    (temp_dir, config_file)
}

#[test]
fn test_config_from_defaults() {
    let config = Config::from_defaults();

    assert!(
        !config.logging.level.is_empty(),
        "Default log level should not be empty"
    );
    assert!(
        !config.paths.preview_dir.is_empty(),
        "Default preview_dir should not be empty"
    );
    assert_eq!(config.roadmap.segment_prefix, "semester-");
    assert!((config.roadmap.tangent_delta - 0.5).abs() < f64::EPSILON);
    assert_eq!(
        config.anchors_for(ViewContext::Full).fractions(),
        &FULL_ANCHORS
    );
    assert_eq!(
        config.anchors_for(ViewContext::Popup).fractions(),
        &POPUP_ANCHORS
    );
}

#[test]
fn test_config_from_toml_basic() {
    let toml_str = r#"
[logging]
level = "info"
file = "/tmp/test.log"
verbose = true

[paths]
svg = "./roadmap.svg"
texts = "./texts.json"
preview_dir = "./previews"

[roadmap]
segment_prefix = "leg-"
tangent_delta = 1.5

[anchors]
full = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7]

[viewport.popup]
left = 10.0
top = 20.0
width = 30.0
height = 40.0
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file, "/tmp/test.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.svg, "./roadmap.svg");
    assert_eq!(config.paths.texts, "./texts.json");
    assert_eq!(config.roadmap.segment_prefix, "leg-");
    assert!((config.roadmap.tangent_delta - 1.5).abs() < f64::EPSILON);
    assert_eq!(config.get("anchors.full").unwrap(), "0.1,0.2,0.3,0.4,0.5,0.6,0.7");
    // popup table not given, falls back to its own defaults
    assert_eq!(
        config.anchors_for(ViewContext::Popup).fractions(),
        &POPUP_ANCHORS
    );
    let popup = config.viewport.for_context(ViewContext::Popup);
    assert!((popup.width - 30.0).abs() < f64::EPSILON);
    assert!((popup.fallback_left - 8.0).abs() < f64::EPSILON);
}

#[test]
fn test_config_from_toml_partial() {
    let toml_str = r#"
[logging]
level = "error"

[paths]
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse partial TOML");

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "");
    assert!(!config.logging.verbose);
    assert_eq!(config.paths.svg, "");
    assert!((config.roadmap.tangent_delta - 0.5).abs() < f64::EPSILON);
}

#[test]
fn test_config_variable_expansion() {
    let toml_str = r#"
[logging]
file = "$ROADMAP_HOME/test.log"

[paths]
svg = "$ROADMAP_HOME/maps/roadmap.svg"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML with variables");

    assert!(config.logging.file.contains("semester-roadmap"));
    assert!(!config.logging.file.contains("$ROADMAP_HOME"));
    assert!(config.paths.svg.ends_with("maps/roadmap.svg"));
    assert!(!config.paths.svg.contains("$ROADMAP_HOME"));
}

#[test]
fn test_config_get_set() {
    let mut config = Config::from_defaults();

    assert!(config.get("level").is_some());

    config.set("level", "debug").expect("Failed to set level");
    assert_eq!(config.get("level").unwrap(), "debug");

    config
        .set("verbose", "true")
        .expect("Failed to set verbose");
    assert!(config.logging.verbose);

    config
        .set("tangent-delta", "0.25")
        .expect("Failed to set tangent delta");
    assert_eq!(config.get("tangent_delta").unwrap(), "0.25");

    config
        .set("anchors.popup", "0.5,0.5,0.5,0.5,0.5,0.5,0.5")
        .expect("Failed to set popup anchors");
    assert_eq!(
        config.get("anchors_popup").unwrap(),
        "0.5,0.5,0.5,0.5,0.5,0.5,0.5"
    );

    assert!(config.get("unknown_key").is_none());
    assert!(config.set("unknown_key", "value").is_err());
}

#[test]
fn test_config_set_rejects_invalid_values() {
    let mut config = Config::from_defaults();

    assert!(config.set("level", "loud").is_err());
    assert!(config.set("verbose", "maybe").is_err());
    assert!(config.set("tangent_delta", "0").is_err());
    assert!(config.set("tangent_delta", "-1").is_err());
    assert!(config.set("segment_prefix", "").is_err());
    assert!(config.set("anchors.full", "0.5,0.5").is_err());
    assert!(config.set("anchors.side", "0.5,0.5,0.5,0.5,0.5,0.5,0.5").is_err());
}

#[test]
fn test_config_unset() {
    let mut config = Config::from_defaults();
    let defaults = Config::from_defaults();

    config.set("level", "error").expect("Failed to set level");
    config
        .set("anchors.full", "0,0,0,0,0,0,0")
        .expect("Failed to set anchors");

    config
        .unset("level", &defaults)
        .expect("Failed to unset level");
    config
        .unset("anchors.full", &defaults)
        .expect("Failed to unset anchors");

    assert_eq!(config.logging.level, defaults.logging.level);
    assert_eq!(
        config.anchors_for(ViewContext::Full),
        defaults.anchors_for(ViewContext::Full)
    );
    assert!(config.unset("nope", &defaults).is_err());
}

#[test]
fn test_config_save_and_load() {
    let (_temp_dir, config_file) = setup_temp_config();

    let mut config = Config::from_defaults();
    config.set("level", "info").expect("Failed to set level");
    config
        .set("anchors.full", "0.9,0.8,0.7,0.6,0.5,0.4,0.3")
        .expect("Failed to set anchors");

    let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");
    fs::write(&config_file, toml_str).expect("Failed to write config");

    let content = fs::read_to_string(&config_file).expect("Failed to read config");
    let loaded_config = Config::from_toml(&content).expect("Failed to parse loaded config");

    assert_eq!(loaded_config.logging.level, "info");
    assert_eq!(
        loaded_config.get("anchors.full").unwrap(),
        "0.9,0.8,0.7,0.6,0.5,0.4,0.3"
    );
}

#[test]
fn test_config_overrides_apply() {
    let mut config = Config::from_defaults();

    let overrides = ConfigOverrides {
        level: Some("error".to_string()),
        file: Some("/custom/path.log".to_string()),
        verbose: Some(true),
        svg: Some("/maps/custom.svg".to_string()),
        texts: Some("/texts/custom.json".to_string()),
        preview_dir: Some("./custom_previews".to_string()),
        tangent_delta: Some(2.0),
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/custom/path.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.svg, "/maps/custom.svg");
    assert_eq!(config.paths.texts, "/texts/custom.json");
    assert_eq!(config.paths.preview_dir, "./custom_previews");
    assert!((config.roadmap.tangent_delta - 2.0).abs() < f64::EPSILON);
}

#[test]
fn test_config_overrides_partial() {
    let mut config = Config::from_defaults();
    let before = config.paths.preview_dir.clone();

    let overrides = ConfigOverrides {
        level: Some("debug".to_string()),
        ..ConfigOverrides::default()
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.paths.preview_dir, before);
}

#[test]
fn test_with_overrides_leaves_stored_config_untouched() {
    let (_temp_dir, config_file) = setup_temp_config();
    let mut stored = Config::from_defaults();
    let stored_svg = stored.paths.svg.clone();

    let overrides = ConfigOverrides {
        svg: Some("/run/only.svg".to_string()),
        ..ConfigOverrides::default()
    };
    let effective = stored.with_overrides(&overrides);
    assert_eq!(effective.paths.svg, "/run/only.svg");

    // a config edit in the same run saves the stored values only
    stored.set("level", "debug").expect("Failed to set level");
    let toml_str = toml::to_string_pretty(&stored).expect("Failed to serialize");
    fs::write(&config_file, toml_str).expect("Failed to write config");

    let content = fs::read_to_string(&config_file).expect("Failed to read config");
    let reloaded = Config::from_toml(&content).expect("Failed to parse saved config");
    assert_eq!(reloaded.logging.level, "debug");
    assert_eq!(reloaded.paths.svg, stored_svg);
    assert!(!content.contains("/run/only.svg"));
}

#[test]
fn test_config_display_format() {
    let config = Config::from_defaults();
    let display_str = format!("{config}");

    assert!(display_str.contains("[logging]"));
    assert!(display_str.contains("[paths]"));
    assert!(display_str.contains("[roadmap]"));
    assert!(display_str.contains("[anchors]"));
    assert!(display_str.contains("[viewport.full]"));
    assert!(display_str.contains("[viewport.popup]"));
    assert!(display_str.contains("tangent_delta"));
}

#[test]
fn test_merge_defaults_adds_missing_fields() {
    let toml_str = r#"
[logging]
level = "error"
file = ""
verbose = false

[paths]
svg = ""
texts = ""
preview_dir = ""

[roadmap]
tangent_delta = -3.0
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse minimal config");
    let defaults = Config::from_defaults();

    let changed = config.merge_defaults(&defaults);

    assert!(
        changed,
        "merge_defaults should return true when fields are added"
    );
    assert_eq!(config.roadmap.segment_prefix, defaults.roadmap.segment_prefix);
    assert_eq!(config.paths.preview_dir, defaults.paths.preview_dir);
    assert!((config.roadmap.tangent_delta - defaults.roadmap.tangent_delta).abs() < f64::EPSILON);
}

#[test]
fn test_merge_defaults_preserves_existing() {
    let toml_str = r#"
[logging]
level = "error"
file = "/my/custom/path.log"
verbose = false

[roadmap]
segment_prefix = "leg-"
tangent_delta = 0.75
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse config");
    let defaults = Config::from_defaults();

    config.merge_defaults(&defaults);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/my/custom/path.log");
    assert_eq!(config.roadmap.segment_prefix, "leg-");
    assert!((config.roadmap.tangent_delta - 0.75).abs() < f64::EPSILON);
}

#[test]
fn test_get_roadmap_dir() {
    let dir = Config::get_roadmap_dir();

    assert!(dir.to_string_lossy().contains("semester-roadmap"));
    assert_ne!(dir, PathBuf::from("."));
}

#[test]
fn test_get_config_file_path() {
    let path = Config::get_config_file_path();

    let path_str = path.to_string_lossy();
    assert!(path_str.ends_with("config.toml") || path_str.ends_with("dconfig.toml"));
}
