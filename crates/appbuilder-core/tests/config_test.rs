use std::collections::HashMap;
use std::path::PathBuf;

use appbuilder_core::{Error, Settings};
use secrecy::ExposeSecret;
use tempfile::TempDir;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn load_returns_defaults_when_no_settings_file() {
    let tmp = TempDir::new().unwrap();
    let settings = Settings::load(&tmp.path().join("appbuilder.toml")).unwrap();

    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 3000);
    assert_eq!(settings.storage.data_path, PathBuf::from("/appdata"));
    assert!(settings.templates.dir.is_none());
    assert_eq!(settings.github.api_url, "https://api.github.com");
    assert_eq!(settings.github.default_branch, "main");
    assert!(settings.github.token.is_none());
}

#[test]
fn load_parses_full_settings() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[server]
host = "127.0.0.1"
port = 8080

[storage]
data_path = "/srv/builder"

[templates]
dir = "/srv/templates"

[github]
api_url = "http://localhost:9999"
default_branch = "master"
"#;
    let path = tmp.path().join("appbuilder.toml");
    std::fs::write(&path, toml).unwrap();

    let settings = Settings::load(&path).unwrap();

    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.storage.data_path, PathBuf::from("/srv/builder"));
    assert_eq!(settings.templates.dir, Some(PathBuf::from("/srv/templates")));
    assert_eq!(settings.github.api_url, "http://localhost:9999");
    assert_eq!(settings.github.default_branch, "master");
}

#[test]
fn load_partial_settings_fills_defaults() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("appbuilder.toml");
    std::fs::write(&path, "[server]\nport = 4000\n").unwrap();

    let settings = Settings::load(&path).unwrap();

    assert_eq!(settings.server.port, 4000);
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.github.default_branch, "main");
}

#[test]
fn load_rejects_malformed_toml() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("appbuilder.toml");
    std::fs::write(&path, "[server\nport = ").unwrap();

    let err = Settings::load(&path).unwrap_err();
    assert!(matches!(err, Error::ConfigParse { .. }), "got: {err:?}");
}

#[test]
fn overrides_replace_file_values() {
    let mut settings = Settings::default();
    settings
        .apply_overrides(env(&[
            ("PORT", "9000"),
            ("DATA_PATH", "/tmp/data"),
            ("APPBUILDER_TEMPLATES_DIR", "/tmp/tpl"),
            ("GITHUB_TOKEN", "ghp_secret"),
        ]))
        .unwrap();

    assert_eq!(settings.server.port, 9000);
    assert_eq!(settings.storage.data_path, PathBuf::from("/tmp/data"));
    assert_eq!(settings.templates.dir, Some(PathBuf::from("/tmp/tpl")));
    assert_eq!(
        settings.github.token.as_ref().map(|t| t.expose_secret().to_owned()),
        Some("ghp_secret".to_owned())
    );
    assert_eq!(settings.projects_dir(), PathBuf::from("/tmp/data/projects"));
    assert_eq!(settings.temp_dir(), PathBuf::from("/tmp/data/temp"));
}

#[test]
fn blank_overrides_are_ignored() {
    let mut settings = Settings::default();
    settings
        .apply_overrides(env(&[("PORT", "  "), ("GITHUB_TOKEN", "")]))
        .unwrap();

    assert_eq!(settings.server.port, 3000);
    assert!(settings.github.token.is_none());
}

#[test]
fn invalid_port_override_is_an_error() {
    let mut settings = Settings::default();
    let err = settings
        .apply_overrides(env(&[("PORT", "eighty")]))
        .unwrap_err();

    assert!(matches!(err, Error::InvalidSetting { key: "PORT", .. }), "got: {err:?}");
}

#[test]
fn token_is_redacted_in_debug_output() {
    let mut settings = Settings::default();
    settings
        .apply_overrides(env(&[("GITHUB_TOKEN", "ghp_topsecret")]))
        .unwrap();

    let debug = format!("{settings:?}");
    assert!(!debug.contains("ghp_topsecret"), "token leaked: {debug}");
}
