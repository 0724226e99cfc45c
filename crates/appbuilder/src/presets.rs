//! Starter configurations offered by the wizard.

use serde::Serialize;
use serde_json::{Value, json};

const DEFAULT_ICON: &str = "https://file.bttcdn.com/appstore/default/defaulticon.webp";

/// A named partial configuration the wizard starts from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    /// Configuration fields to pre-fill; everything else keeps its default.
    pub preset: Value,
}

/// All presets, in catalog order.
pub fn presets() -> Vec<Preset> {
    vec![
        web_app_simple(),
        app_with_database(),
        mail_server(),
        media_server(),
        backend_api(),
    ]
}

pub fn preset(id: &str) -> Option<Preset> {
    presets().into_iter().find(|p| p.id == id)
}

fn web_app_simple() -> Preset {
    Preset {
        id: "web-app-simple",
        name: "Simple Web Application",
        description: "A basic web application with a single HTTP port",
        icon: DEFAULT_ICON,
        preset: json!({
            "metadata": { "category": "Utilities", "version": "1.0.0" },
            "ports": [
                { "name": "http", "containerPort": 80, "protocol": "TCP", "type": "web",
                  "entrance": { "enabled": true, "title": "Web UI", "authLevel": "private" } }
            ],
            "storage": { "pvc": { "enabled": false } },
            "resources": resources(("100m", "128Mi"), ("500m", "512Mi")),
            "probes": probes("httpGet", Some("/"), "http", (30, 10), (10, 5)),
        }),
    }
}

fn app_with_database() -> Preset {
    Preset {
        id: "app-with-database",
        name: "Application with Database",
        description: "Web application with persistent storage for database",
        icon: DEFAULT_ICON,
        preset: json!({
            "metadata": { "category": "Productivity", "version": "1.0.0" },
            "ports": [
                { "name": "http", "containerPort": 8080, "protocol": "TCP", "type": "web",
                  "entrance": { "enabled": true, "title": "Web UI", "authLevel": "private" } }
            ],
            "storage": {
                "pvc": { "enabled": true, "size": "20Gi", "mountPath": "/data" },
                "appData": { "enabled": true, "mountPath": "/app/data" },
            },
            "environment": [
                { "name": "DB_HOST", "value": "localhost", "type": "string" },
                { "name": "DB_PASSWORD", "value": "changeme", "type": "string", "secret": true },
            ],
            "resources": resources(("200m", "512Mi"), ("2000m", "2Gi")),
            "probes": probes("tcpSocket", None, "http", (60, 10), (30, 5)),
        }),
    }
}

fn mail_server() -> Preset {
    Preset {
        id: "mail-server",
        name: "Mail Server",
        description: "Email server with SMTP, IMAP, and web interface",
        icon: DEFAULT_ICON,
        preset: json!({
            "metadata": { "category": "Communication", "version": "1.0.0" },
            "ports": [
                { "name": "http", "containerPort": 8080, "protocol": "TCP", "type": "web",
                  "entrance": { "enabled": true, "title": "Admin Panel", "authLevel": "private" } },
                { "name": "smtp", "containerPort": 25, "protocol": "TCP", "type": "network",
                  "description": "SMTP server" },
                { "name": "imap", "containerPort": 143, "protocol": "TCP", "type": "network",
                  "description": "IMAP server" },
                { "name": "imaps", "containerPort": 993, "protocol": "TCP", "type": "network",
                  "description": "IMAP over SSL" },
            ],
            "storage": { "pvc": { "enabled": true, "size": "50Gi", "mountPath": "/var/mail" } },
            "environment": [
                { "name": "ADMIN_PASSWORD", "value": "changeme123", "type": "string", "secret": true },
            ],
            "resources": resources(("200m", "512Mi"), ("2000m", "2Gi")),
            "probes": probes("tcpSocket", None, "http", (60, 10), (30, 5)),
        }),
    }
}

fn media_server() -> Preset {
    Preset {
        id: "media-server",
        name: "Media Server",
        description: "Media streaming server with large storage",
        icon: DEFAULT_ICON,
        preset: json!({
            "metadata": { "category": "Entertainment", "version": "1.0.0" },
            "ports": [
                { "name": "http", "containerPort": 8096, "protocol": "TCP", "type": "web",
                  "entrance": { "enabled": true, "title": "Media Library", "authLevel": "private" } }
            ],
            "storage": {
                "pvc": { "enabled": true, "size": "100Gi", "mountPath": "/media" },
                "appData": { "enabled": true, "mountPath": "/config" },
                "appCache": { "enabled": true, "mountPath": "/cache" },
            },
            "resources": resources(("500m", "1Gi"), ("4000m", "4Gi")),
            "probes": probes("httpGet", Some("/health"), "http", (60, 10), (30, 5)),
        }),
    }
}

fn backend_api() -> Preset {
    Preset {
        id: "backend-api",
        name: "Backend API Service",
        description: "REST API service without web UI",
        icon: DEFAULT_ICON,
        preset: json!({
            "metadata": { "category": "Development", "version": "1.0.0" },
            "ports": [
                { "name": "api", "containerPort": 3000, "protocol": "TCP", "type": "network",
                  "description": "API endpoint" }
            ],
            "storage": { "pvc": { "enabled": false } },
            "environment": [
                { "name": "API_KEY", "value": "", "type": "string", "secret": true },
                { "name": "LOG_LEVEL", "value": "info", "type": "select",
                  "options": ["debug", "info", "warn", "error"] },
            ],
            "resources": resources(("100m", "256Mi"), ("1000m", "1Gi")),
            "probes": probes("httpGet", Some("/health"), "api", (30, 10), (10, 5)),
        }),
    }
}

fn resources(requests: (&str, &str), limits: (&str, &str)) -> Value {
    json!({
        "requests": { "cpu": requests.0, "memory": requests.1 },
        "limits": { "cpu": limits.0, "memory": limits.1 },
    })
}

/// Liveness and readiness share kind, path and port; timings are
/// `(initialDelaySeconds, periodSeconds)`.
fn probes(kind: &str, path: Option<&str>, port: &str, liveness: (u32, u32), readiness: (u32, u32)) -> Value {
    let probe = |(delay, period): (u32, u32)| {
        let mut probe = json!({
            "enabled": true,
            "type": kind,
            "port": port,
            "initialDelaySeconds": delay,
            "periodSeconds": period,
        });
        if let Some(path) = path {
            probe["path"] = json!(path);
        }
        probe
    };
    json!({ "liveness": probe(liveness), "readiness": probe(readiness) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use appbuilder_core::{Configuration, PortKind, ProbeKind, validate};

    /// A preset with the identity fields a user would type in.
    fn filled(preset: &Preset) -> Configuration {
        let mut config: Configuration = serde_json::from_value(preset.preset.clone()).unwrap();
        config.metadata.name = preset.id.to_owned();
        config.metadata.title = preset.name.to_owned();
        config.metadata.description = preset.description.to_owned();
        config.docker.repository = "example/app".to_owned();
        config
    }

    #[test]
    fn catalog_order_and_ids() {
        let ids: Vec<_> = presets().iter().map(|p| p.id).collect();
        assert_eq!(
            ids,
            ["web-app-simple", "app-with-database", "mail-server", "media-server", "backend-api"]
        );
    }

    #[test]
    fn every_preset_completes_to_a_valid_configuration() {
        for preset in presets() {
            let errors = validate(&filled(&preset));
            assert!(errors.is_empty(), "{}: {errors:?}", preset.id);
        }
    }

    #[test]
    fn probe_ports_name_declared_ports() {
        for preset in presets() {
            let config = filled(&preset);
            for probe in [&config.probes.liveness, &config.probes.readiness] {
                assert!(
                    config.ports.iter().any(|p| p.name == probe.port),
                    "{}: probe port {} is not declared",
                    preset.id,
                    probe.port
                );
            }
        }
    }

    #[test]
    fn mail_server_shape() {
        let config = filled(&preset("mail-server").unwrap());
        let ports: Vec<_> = config.ports.iter().map(|p| (p.name.as_str(), p.container_port)).collect();
        assert_eq!(ports, [("http", 8080), ("smtp", 25), ("imap", 143), ("imaps", 993)]);
        assert_eq!(config.ports[0].kind, PortKind::Web);
        assert!(config.ports[1..].iter().all(|p| p.kind == PortKind::Network));
        assert!(config.storage.pvc.enabled);
        assert_eq!(config.storage.pvc.mount_path, "/var/mail");
        assert!(config.environment[0].secret);
    }

    #[test]
    fn backend_api_probes_the_api_port() {
        let config = filled(&preset("backend-api").unwrap());
        assert_eq!(config.probes.liveness.kind, ProbeKind::HttpGet);
        assert_eq!(config.probes.liveness.path.as_deref(), Some("/health"));
        assert_eq!(config.probes.readiness.port, "api");
        assert_eq!(config.environment[1].options, ["debug", "info", "warn", "error"]);
    }

    #[test]
    fn unknown_preset() {
        assert!(preset("nope").is_none());
    }
}
