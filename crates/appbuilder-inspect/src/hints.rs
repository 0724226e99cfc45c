//! Deployment hints extracted from a `Dockerfile` and a compose file.

use std::sync::LazyLock;

use appbuilder_core::Protocol;
use regex::Regex;
use serde::Serialize;
use serde_yaml::Value;

static EXPOSE_PORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(?:/(tcp|udp))?").expect("expose pattern is valid"));

static ENV_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ENV\s+([A-Z_][A-Z0-9_]*)\s*=?\s*(.*)$").expect("env pattern is valid")
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DockerHints {
    pub image: Option<String>,
    pub ports: Vec<DetectedPort>,
    pub env: Vec<DetectedEnv>,
    pub volumes: Vec<DetectedVolume>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedPort {
    pub container: u32,
    pub protocol: Protocol,
    pub name: String,
}

impl DetectedPort {
    fn new(container: u32, protocol: Protocol) -> Self {
        Self {
            container,
            protocol,
            name: guess_port_name(container),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedEnv {
    pub name: String,
    pub default: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedVolume {
    pub path: String,
}

impl DockerHints {
    /// Overlay `other` onto `self`: each non-empty field of `other` replaces
    /// the corresponding field.
    pub fn merge(mut self, other: DockerHints) -> DockerHints {
        if other.image.is_some() {
            self.image = other.image;
        }
        if !other.ports.is_empty() {
            self.ports = other.ports;
        }
        if !other.env.is_empty() {
            self.env = other.env;
        }
        if !other.volumes.is_empty() {
            self.volumes = other.volumes;
        }
        self
    }
}

/// Conventional service name for a well-known port, `port-<n>` otherwise.
pub fn guess_port_name(port: u32) -> String {
    let name = match port {
        80 | 8080 => "http",
        443 | 8443 => "https",
        25 => "smtp",
        587 => "smtp-submission",
        465 => "smtps",
        143 => "imap",
        993 => "imaps",
        110 => "pop3",
        995 => "pop3s",
        3306 => "mysql",
        5432 => "postgres",
        6379 => "redis",
        27017 => "mongodb",
        9200 => "elasticsearch",
        5672 => "rabbitmq",
        _ => return format!("port-{port}"),
    };
    name.to_owned()
}

fn protocol_from(s: Option<&str>) -> Protocol {
    match s {
        Some(p) if p.eq_ignore_ascii_case("udp") => Protocol::Udp,
        _ => Protocol::Tcp,
    }
}

// ── Dockerfile ──

/// Scan a Dockerfile line by line.
///
/// The image is the last `FROM` that does not name a build stage, so a
/// multi-stage build reports its runtime base.
pub fn parse_dockerfile(content: &str) -> DockerHints {
    let mut hints = DockerHints::default();

    for line in content.lines().map(str::trim) {
        if let Some(rest) = instruction(line, "FROM") {
            let words: Vec<&str> = rest
                .split_whitespace()
                .filter(|w| !w.starts_with("--"))
                .collect();
            let is_stage = words.iter().any(|w| w.eq_ignore_ascii_case("as"));
            if let (Some(image), false) = (words.first(), is_stage) {
                hints.image = Some((*image).to_owned());
            }
        } else if let Some(rest) = instruction(line, "EXPOSE") {
            for word in rest.split_whitespace() {
                if let Some(caps) = EXPOSE_PORT.captures(word)
                    && let Ok(port) = caps[1].parse()
                {
                    let protocol = protocol_from(caps.get(2).map(|m| m.as_str()));
                    hints.ports.push(DetectedPort::new(port, protocol));
                }
            }
        } else if let Some(caps) = ENV_LINE.captures(line) {
            hints.env.push(DetectedEnv {
                name: caps[1].to_owned(),
                default: caps[2].replace(['"', '\''], ""),
            });
        } else if let Some(rest) = instruction(line, "VOLUME") {
            let paths = rest
                .trim_start_matches('[')
                .trim_end_matches(']')
                .split([',', ' ', '\t'])
                .map(|p| p.trim().trim_matches(['"', '\'']))
                .filter(|p| p.starts_with('/'));
            hints.volumes.extend(paths.map(|p| DetectedVolume { path: p.to_owned() }));
        }
    }

    hints
}

fn instruction<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let (head, rest) = line.split_once(char::is_whitespace)?;
    head.eq_ignore_ascii_case(keyword).then_some(rest.trim())
}

// ── docker-compose.yml ──

/// Read the first service of a compose file. Unparseable input yields
/// empty hints.
pub fn parse_compose(content: &str) -> DockerHints {
    let doc: Value = match serde_yaml::from_str(content) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!(error = %e, "docker-compose.yml is not valid YAML");
            return DockerHints::default();
        }
    };

    let Some(service) = doc
        .get("services")
        .and_then(Value::as_mapping)
        .and_then(|services| services.values().next())
    else {
        return DockerHints::default();
    };

    DockerHints {
        image: service.get("image").and_then(Value::as_str).map(str::to_owned),
        ports: compose_ports(service.get("ports")),
        env: compose_env(service.get("environment")),
        volumes: compose_volumes(service.get("volumes")),
    }
}

fn compose_ports(ports: Option<&Value>) -> Vec<DetectedPort> {
    let Some(ports) = ports.and_then(Value::as_sequence) else {
        return Vec::new();
    };

    ports
        .iter()
        .filter_map(|port| match port {
            // "8080:80", "127.0.0.1:8080:80/udp", "80"
            Value::String(spec) => {
                let container = spec.rsplit(':').next().unwrap_or(spec);
                let (number, protocol) = match container.split_once('/') {
                    Some((n, p)) => (n, Some(p)),
                    None => (container, None),
                };
                let number = number.split('-').next().unwrap_or(number);
                // arch-lint: allow(no-silent-result-drop) reason="unparsable port specs are skipped, not fatal"
                let port = number.trim().parse().ok()?;
                Some(DetectedPort::new(port, protocol_from(protocol)))
            }
            Value::Number(n) => {
                // arch-lint: allow(no-silent-result-drop) reason="out-of-range ports are skipped"
                let port = u32::try_from(n.as_u64()?).ok()?;
                Some(DetectedPort::new(port, Protocol::Tcp))
            }
            Value::Mapping(_) => {
                let number = port
                    .get("target")
                    .or_else(|| port.get("published"))
                    .and_then(port_number)?;
                Some(DetectedPort::new(number, port_protocol(port.get("protocol"))))
            }
            _ => None,
        })
        .filter(|p| p.container > 0)
        .collect()
}

fn port_number(value: &Value) -> Option<u32> {
    match value {
        // arch-lint: allow(no-silent-result-drop) reason="out-of-range ports are treated as absent"
        Value::Number(n) => u32::try_from(n.as_u64()?).ok(),
        // arch-lint: allow(no-silent-result-drop) reason="a port that does not parse is treated as absent"
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn port_protocol(value: Option<&Value>) -> Protocol {
    protocol_from(value.and_then(Value::as_str))
}

fn compose_env(env: Option<&Value>) -> Vec<DetectedEnv> {
    match env {
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|item| {
                let (name, default) = item.split_once('=').unwrap_or((item, ""));
                DetectedEnv {
                    name: name.to_owned(),
                    default: default.to_owned(),
                }
            })
            .collect(),
        Some(Value::Mapping(map)) => map
            .iter()
            .filter_map(|(name, value)| {
                Some(DetectedEnv {
                    name: name.as_str()?.to_owned(),
                    default: scalar_to_string(value),
                })
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn compose_volumes(volumes: Option<&Value>) -> Vec<DetectedVolume> {
    let Some(volumes) = volumes.and_then(Value::as_sequence) else {
        return Vec::new();
    };

    volumes
        .iter()
        .filter_map(|volume| match volume {
            // "data:/var/lib/data:ro" or "/var/lib/data"
            Value::String(spec) => {
                let mut parts = spec.split(':');
                let first = parts.next()?;
                Some(parts.next().unwrap_or(first).to_owned())
            }
            Value::Mapping(_) => volume.get("target").and_then(Value::as_str).map(str::to_owned),
            _ => None,
        })
        .filter(|path| path.starts_with('/'))
        .map(|path| DetectedVolume { path })
        .collect()
}
