use appbuilder_core::{Configuration, Error, ProbeKind, derive_app_id};
use tempfile::TempDir;

const SAMPLE: &str = r#"{
  "metadata": {"name": "sample-app", "title": "Sample", "description": "A sample", "version": "1.0.0"},
  "docker": {"repository": "nginx", "tag": "latest"},
  "ports": [{"name": "http", "containerPort": 80, "protocol": "TCP"}],
  "storage": {
    "pvc": {"enabled": false},
    "appData": {"enabled": true, "mountPath": "/appdata"},
    "appCache": {"enabled": true, "mountPath": "/appcache"}
  },
  "environment": [],
  "resources": {
    "requests": {"cpu": "100m", "memory": "128Mi"},
    "limits": {"cpu": "500m", "memory": "512Mi"}
  }
}"#;

#[test]
fn load_reads_wizard_export() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.json");
    std::fs::write(&path, SAMPLE).unwrap();

    let config = Configuration::load(&path).unwrap();
    assert_eq!(config.metadata.name, "sample-app");
    assert_eq!(config.ports.len(), 1);
    assert_eq!(config.ports[0].container_port, 80);
    assert_eq!(config.probes.liveness.kind, ProbeKind::TcpSocket);
    config.ensure_valid().unwrap();
}

#[test]
fn load_reports_missing_file() {
    let tmp = TempDir::new().unwrap();
    let err = Configuration::load(&tmp.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, Error::ConfigurationRead { .. }), "got: {err:?}");
}

#[test]
fn load_reports_malformed_json() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.json");
    std::fs::write(&path, "{\"metadata\": ").unwrap();

    let err = Configuration::load(&path).unwrap_err();
    assert!(matches!(err, Error::ConfigurationParse { .. }), "got: {err:?}");
}

#[test]
fn ensure_valid_collects_messages() {
    let config: Configuration = serde_json::from_str(r#"{"metadata": {"name": "Bad_Name"}}"#).unwrap();
    let err = config.ensure_valid().unwrap_err();
    let Error::Invalid(messages) = &err else {
        panic!("expected Invalid, got {err:?}");
    };
    assert!(messages[0].contains("lowercase alphanumeric"));
    assert!(err.to_string().contains("Title is required"));
}

#[test]
fn appid_is_derived_once_and_then_kept() {
    let config: Configuration = serde_json::from_str(SAMPLE).unwrap();
    let first = config.with_defaults();
    assert_eq!(first.metadata.appid.as_deref(), Some(derive_app_id("sample-app").as_str()));

    // renaming after the appid was issued does not change it
    let mut renamed = first.clone();
    renamed.metadata.name = "renamed-app".to_owned();
    let second = renamed.with_defaults();
    assert_eq!(second.metadata.appid, first.metadata.appid);
}

#[test]
fn empty_appid_string_counts_as_absent() {
    let config: Configuration =
        serde_json::from_str(r#"{"metadata": {"name": "my-app", "appid": ""}}"#).unwrap();
    let defaulted = config.with_defaults();
    assert_eq!(defaulted.metadata.appid.as_deref(), Some(derive_app_id("my-app").as_str()));
}
