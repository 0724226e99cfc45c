use appbuilder_core::{AuthLevel, Configuration, Entrance, EnvVar, Port, PortKind};
use serde::Serialize;

use crate::hints::DockerHints;

/// Longest description taken from a README.
pub const README_SUMMARY_MAX_CHARS: usize = 200;

const SECRET_MARKERS: [&str; 3] = ["PASSWORD", "SECRET", "KEY"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepositorySummary {
    pub name: String,
    pub description: String,
    pub language: String,
    pub stars: u64,
    pub license: String,
}

/// What an inspection found, shaped for the wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepositoryAnalysis {
    pub repository: RepositorySummary,
    pub docker: DockerHints,
}

impl RepositoryAnalysis {
    /// Pre-fill a configuration with everything that was detected.
    ///
    /// Only detected values are written; anything not found leaves the
    /// configuration as it was.
    pub fn apply_to(&self, config: &mut Configuration) {
        if !self.repository.description.is_empty() {
            config.metadata.description = self.repository.description.clone();
        }

        if let Some(image) = &self.docker.image {
            let (repository, tag) = split_image(image);
            config.docker.repository = repository.to_owned();
            config.docker.tag = tag.unwrap_or("latest").to_owned();
        }

        if !self.docker.ports.is_empty() {
            let entrance_title = if config.metadata.title.is_empty() {
                "Web UI".to_owned()
            } else {
                config.metadata.title.clone()
            };
            config.ports = self
                .docker
                .ports
                .iter()
                .map(|detected| {
                    let web = matches!(detected.container, 80 | 8080) || detected.name == "http";
                    Port {
                        name: detected.name.clone(),
                        container_port: detected.container,
                        protocol: detected.protocol,
                        kind: if web { PortKind::Web } else { PortKind::Network },
                        description: String::new(),
                        entrance: Some(Entrance {
                            enabled: web,
                            title: entrance_title.clone(),
                            auth_level: AuthLevel::Private,
                        }),
                    }
                })
                .collect();
        }

        if !self.docker.env.is_empty() {
            config.environment = self
                .docker
                .env
                .iter()
                .map(|detected| EnvVar {
                    name: detected.name.clone(),
                    value: Some(detected.default.clone()),
                    secret: SECRET_MARKERS.iter().any(|m| detected.name.contains(m)),
                    ..EnvVar::default()
                })
                .collect();
        }

        if let Some(volume) = self.docker.volumes.first() {
            config.storage.pvc.enabled = true;
            config.storage.pvc.mount_path = volume.path.clone();
        }
    }
}

/// Split `repository[:tag]`, leaving a registry port (`host:5000/app`) in
/// the repository.
pub fn split_image(image: &str) -> (&str, Option<&str>) {
    match image.rsplit_once(':') {
        Some((repository, tag)) if !tag.contains('/') => (repository, Some(tag)),
        _ => (image, None),
    }
}

/// First paragraph of a README (the second block when split on blank lines,
/// else the first line), with markdown markup removed.
pub fn readme_summary(readme: &str) -> Option<String> {
    let readme = readme.replace("\r\n", "\n");
    let paragraph = readme
        .split("\n\n")
        .nth(1)
        .filter(|p| !p.is_empty())
        .or_else(|| readme.lines().next())?;

    let cleaned: String = paragraph
        .chars()
        .filter(|c| !matches!(c, '#' | '*' | '`' | '[' | ']'))
        .collect();
    let summary: String = cleaned.trim().chars().take(README_SUMMARY_MAX_CHARS).collect();
    (!summary.is_empty()).then_some(summary)
}
