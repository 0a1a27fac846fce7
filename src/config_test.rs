// Tests for settings loading
// Test code is excluded from coverage since we measure production code coverage
#![cfg_attr(coverage_nightly, coverage(off))]

use super::*;
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.long_press_timeout_ms, DEFAULT_LONG_PRESS_TIMEOUT_MS);
    assert_eq!(settings.log_level, None);
    assert!(settings.host.assume_media_active);
    assert!(!settings.host.screen_interactive);
    assert_eq!(settings.long_press_timeout(), Duration::from_millis(400));
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let settings = Settings::load_from(&dir.path().join("absent.json")).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_partial_file_fills_in_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(SETTINGS_FILE_NAME);
    std::fs::write(&path, r#"{ "longPressTimeoutMs": 650, "host": { "screenInteractive": true } }"#)
        .unwrap();

    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(settings.long_press_timeout_ms, 650);
    assert!(settings.host.screen_interactive);
    assert!(settings.host.assume_media_active);
}

#[test]
fn test_malformed_file_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(SETTINGS_FILE_NAME);
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(
        Settings::load_from(&path),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn test_out_of_range_timeout_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(SETTINGS_FILE_NAME);

    for bad in [0u64, MAX_LONG_PRESS_TIMEOUT_MS + 1] {
        std::fs::write(&path, format!(r#"{{ "longPressTimeoutMs": {} }}"#, bad)).unwrap();
        match Settings::load_from(&path) {
            Err(ConfigError::Invalid { key, .. }) => assert_eq!(key, "longPressTimeoutMs"),
            other => panic!("expected invalid setting for {}, got {:?}", bad, other),
        }
    }
}

#[test]
fn test_save_then_load_in_nested_dir() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(APP_DIR_NAME).join(SETTINGS_FILE_NAME);

    let settings = Settings {
        long_press_timeout_ms: 300,
        log_level: Some("debug".to_string()),
        host: HostSettings {
            assume_media_active: false,
            screen_interactive: true,
        },
    };
    settings.save_to(&path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("\"longPressTimeoutMs\": 300"));
    assert_eq!(Settings::load_from(&path).unwrap(), settings);
}

#[test]
fn test_save_refuses_invalid_settings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(SETTINGS_FILE_NAME);
    let settings = Settings {
        long_press_timeout_ms: 0,
        ..Default::default()
    };

    assert!(settings.save_to(&path).is_err());
    assert!(!path.exists());
}

#[test]
fn test_settings_path_ends_with_app_dir() {
    if let Ok(path) = get_settings_path() {
        assert!(path.ends_with(format!("{}/{}", APP_DIR_NAME, SETTINGS_FILE_NAME)));
    }
}

#[test]
fn test_first_load_writes_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(APP_DIR_NAME).join(SETTINGS_FILE_NAME);

    let settings = Settings::load_or_init(&path).unwrap();
    assert_eq!(settings, Settings::default());
    assert!(path.exists());
    assert_eq!(Settings::load_from(&path).unwrap(), Settings::default());
}

#[test]
fn test_load_or_init_keeps_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(SETTINGS_FILE_NAME);
    std::fs::write(&path, r#"{ "longPressTimeoutMs": 900 }"#).unwrap();

    let settings = Settings::load_or_init(&path).unwrap();
    assert_eq!(settings.long_press_timeout_ms, 900);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        r#"{ "longPressTimeoutMs": 900 }"#
    );
}

#[test]
fn test_load_or_init_falls_back_when_unwritable() {
    let dir = TempDir::new().unwrap();
    // Parent "directory" is a regular file, so the write must fail
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    let path = blocker.join(SETTINGS_FILE_NAME);

    let settings = Settings::load_or_init(&path).unwrap();
    assert_eq!(settings, Settings::default());
    assert!(!path.exists());
}

#[test]
fn test_serialize_error_is_not_reported_as_malformed_file() {
    let source = serde_json::from_str::<u8>("x").unwrap_err();
    let err = ConfigError::Serialize {
        path: PathBuf::from("/tmp/settings.json"),
        source,
    };
    let message = err.to_string();
    assert!(message.starts_with("Failed to serialize settings"), "{}", message);
    assert!(!message.contains("Malformed"));
}
