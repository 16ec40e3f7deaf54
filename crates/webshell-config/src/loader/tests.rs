//! Tests for config loading and path resolution.

use super::*;
use crate::schema::RunMode;
use std::path::Path;
use webshell_common::ConfigError;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_webshell_config.json"));
    let err = result.unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound(_)));
}

#[test]
fn unreadable_config_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_from_path(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }), "got {err:?}");
}

#[test]
fn executable_location_failures_are_io_errors() {
    let err = paths::parent_dir(Path::new("/")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }), "got {err:?}");
    assert!(err.to_string().starts_with("could not locate directory of /"));

    let dir = paths::parent_dir(Path::new("/opt/webshell/webshell")).unwrap();
    assert_eq!(dir, Path::new("/opt/webshell"));
}

#[test]
fn load_valid_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"go-url":{"url":"https://example.org","width":1024,"title":"Docs"}}"#,
    )
    .unwrap();

    let doc = load_from_path(&path).unwrap();
    let go_url = doc.go_url.unwrap();
    assert_eq!(go_url.url.as_deref(), Some("https://example.org"));
    assert_eq!(go_url.width, 1024);
    assert_eq!(go_url.height, 450);
    assert_eq!(go_url.title.as_deref(), Some("Docs"));
}

#[test]
fn load_valid_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[with-session]
url = "ws://127.0.0.1:9000/session"
"#,
    )
    .unwrap();

    let doc = load_from_path(&path).unwrap();
    match doc.run_mode(&path).unwrap() {
        RunMode::Orchestrated(session) => assert_eq!(session.url, "ws://127.0.0.1:9000/session"),
        other => panic!("expected orchestrated mode, got {other:?}"),
    }
}

#[test]
fn load_invalid_json_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "this is not json {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));
}

#[test]
fn explicit_file_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = resolve_config_path(Some("/etc/webshell/custom.json"), Some("kiosk"), dir.path());
    assert_eq!(path, Path::new("/etc/webshell/custom.json"));
}

#[test]
fn preset_resolves_under_preset_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = resolve_config_path(None, Some("kiosk"), dir.path());
    assert_eq!(path, dir.path().join(PRESET_DIR).join("kiosk.json"));
}

#[test]
fn empty_selectors_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), "{}").unwrap();
    let path = resolve_config_path(Some(""), Some(""), dir.path());
    assert_eq!(path, dir.path().join("config.json"));
}

#[test]
fn default_beside_executable_when_present() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), "{}").unwrap();
    let path = resolve_config_path(None, None, dir.path());
    assert_eq!(path, dir.path().join("config.json"));
}
