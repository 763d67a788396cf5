// Integration tests for the settings store and its conversion into a style

use rstest::rstest;
use std::path::PathBuf;
use watermarker::config::{NumericField, Settings, SettingsStore};
use watermarker::watermark::{AnchorMode, Color, WatermarkError, WatermarkProcessor};

#[test]
fn test_settings_file_from_legacy_tool() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{"watermark_text": "样品 Sample", "font_size": "40", "opacity": "100", "color": [255, 255, 0], "position": "中心"}"#,
    )
    .unwrap();

    let settings = SettingsStore::new(&path).load().unwrap();
    assert_eq!(settings.fonts.default, PathBuf::from("arial.ttf"));
    assert_eq!(settings.output_dir_name, "Watermarked_Images");

    let style = settings.to_style().unwrap();
    assert_eq!(style.text, "样品 Sample");
    assert_eq!(style.font_size, 40);
    assert_eq!(style.alpha(), 255);
    assert_eq!(style.anchor, AnchorMode::Center);
}

#[rstest]
#[case("左上角", AnchorMode::TopLeft)]
#[case("右上角", AnchorMode::TopRight)]
#[case("左下角", AnchorMode::BottomLeft)]
#[case("右下角", AnchorMode::BottomRight)]
#[case("中心", AnchorMode::Center)]
#[case("bottom-right", AnchorMode::BottomRight)]
fn test_anchor_labels(#[case] label: &str, #[case] expected: AnchorMode) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.yaml");
    std::fs::write(&path, format!("position: \"{}\"\n", label)).unwrap();

    let settings = SettingsStore::new(&path).load().unwrap();
    assert_eq!(settings.position, expected);
}

#[test]
fn test_saved_settings_use_canonical_labels() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::new(dir.path().join("settings.json"));
    let settings = Settings {
        position: AnchorMode::TopRight,
        color: Color::new(1, 2, 3),
        ..Default::default()
    };
    store.save(&settings).unwrap();

    let raw = std::fs::read_to_string(store.path()).unwrap();
    assert!(raw.contains("\"top-right\""));
    assert!(raw.contains("\"fonts\""));
    assert_eq!(store.load().unwrap(), settings);
}

#[test]
fn test_invalid_settings_rejected_before_fonts_load() {
    // Font paths do not exist; validation must fail first
    let settings = Settings {
        opacity: NumericField::Text("lots".to_string()),
        ..Default::default()
    };
    let err = WatermarkProcessor::from_settings(&settings).unwrap_err();
    assert!(matches!(err, WatermarkError::ConfigError(_)));
}

#[test]
fn test_corrupt_settings_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = SettingsStore::new(&path).load().unwrap_err();
    assert!(matches!(err, WatermarkError::ConfigError(_)));
}

#[test]
fn test_env_reference_in_font_path() {
    std::env::set_var("WATERMARKER_IT_FONT_DIR", "/opt/fonts");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.yml");
    std::fs::write(
        &path,
        "fonts:\n  default: ${WATERMARKER_IT_FONT_DIR}/latin.ttf\n  wide: ${WATERMARKER_IT_FONT_DIR}/cjk.ttc\n",
    )
    .unwrap();

    let settings = SettingsStore::new(&path).load().unwrap();
    assert_eq!(settings.fonts.default, PathBuf::from("/opt/fonts/latin.ttf"));
    assert_eq!(settings.fonts.wide, PathBuf::from("/opt/fonts/cjk.ttc"));

    std::env::remove_var("WATERMARKER_IT_FONT_DIR");
}
