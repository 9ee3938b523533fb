use layerkit_designer::FontSource;
use layerkit_settings::{Config, SettingsError};
use std::fs;

#[test]
fn test_toml_and_json_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.layout.auth_token = Some("secret".to_string());
    config.arrangement.spacing = 64.0;
    config
        .fonts
        .preload
        .push(FontSource::new("Inter", "https://fonts.example/inter.woff2"));

    for name in ["config.toml", "config.json"] {
        let path = dir.path().join("nested").join(name);
        config.save_to_file(&path).unwrap();
        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}

#[test]
fn test_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "layout: {}").unwrap();
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::Config(_))
    ));
    assert!(Config::default().save_to_file(&path).is_err());
}

#[test]
fn test_invalid_file_is_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[layout]\ntimeout_ms = 0\n").unwrap();
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::InvalidSetting { .. })
    ));

    fs::write(&path, "[layout\n").unwrap();
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::TomlError(_))
    ));
}

#[test]
fn test_load_or_default_with_explicit_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.toml");
    assert!(matches!(
        Config::load_or_default(Some(&missing)),
        Err(SettingsError::LoadError(_))
    ));
}
