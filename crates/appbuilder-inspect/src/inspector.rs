use appbuilder_core::GithubSettings;

use crate::analysis::{RepositoryAnalysis, RepositorySummary, readme_summary};
use crate::error::{FetchError, InspectError};
use crate::fetcher::{GithubFetcher, RepoFetcher};
use crate::hints::{DockerHints, parse_compose, parse_dockerfile};
use crate::repo::RepoRef;

pub const DOCKERFILE: &str = "Dockerfile";
pub const COMPOSE_FILE: &str = "docker-compose.yml";

/// An optional repository file: fetched, or not available for any reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Present(String),
    Absent,
}

impl Artifact {
    /// Collapse a fetch result. Failures never propagate; a missing file is
    /// expected, anything else is logged.
    pub fn resolve(name: &str, result: Result<String, FetchError>) -> Self {
        match result {
            Ok(content) => Self::Present(content),
            Err(e) if e.is_not_found() => {
                tracing::debug!(artifact = name, "not present in repository");
                Self::Absent
            }
            Err(e) => {
                tracing::warn!(artifact = name, error = %e, "fetch failed; continuing without it");
                Self::Absent
            }
        }
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Present(content) => Some(content),
            Self::Absent => None,
        }
    }
}

/// Repository inspector, parameterized over the fetcher for testability.
pub struct RepoInspector<F: RepoFetcher = GithubFetcher> {
    fetcher: F,
    default_branch: String,
}

impl RepoInspector<GithubFetcher> {
    pub fn from_settings(settings: &GithubSettings) -> Result<Self, FetchError> {
        let fetcher = GithubFetcher::new(&settings.api_url, settings.token.as_ref())?;
        Ok(Self::with_fetcher(fetcher, &settings.default_branch))
    }
}

impl<F: RepoFetcher> RepoInspector<F> {
    pub fn with_fetcher(fetcher: F, default_branch: &str) -> Self {
        Self {
            fetcher,
            default_branch: default_branch.to_owned(),
        }
    }

    /// Inspect the repository at `url` on `branch` (the configured default
    /// branch when `None` or blank).
    ///
    /// Only the repository lookup itself can fail; the Dockerfile, compose
    /// file and README are each optional.
    pub async fn analyze(
        &self,
        url: &str,
        branch: Option<&str>,
    ) -> Result<RepositoryAnalysis, InspectError> {
        let repo = RepoRef::parse(url)?;
        let branch = branch
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(&self.default_branch);

        tracing::info!(%repo, branch, "inspecting repository");

        let info = self.fetcher.repository(&repo).await.map_err(|e| {
            if e.is_not_found() {
                InspectError::RepositoryNotFound {
                    repo: repo.to_string(),
                }
            } else {
                InspectError::Fetch {
                    repo: repo.to_string(),
                    source: e,
                }
            }
        })?;

        let (dockerfile, compose, readme) = tokio::join!(
            self.fetcher.file(&repo, DOCKERFILE, branch),
            self.fetcher.file(&repo, COMPOSE_FILE, branch),
            self.fetcher.readme(&repo),
        );
        let dockerfile = Artifact::resolve(DOCKERFILE, dockerfile);
        let compose = Artifact::resolve(COMPOSE_FILE, compose);
        let readme = Artifact::resolve("README", readme);

        let mut docker = DockerHints::default();
        if let Some(content) = dockerfile.content() {
            docker = docker.merge(parse_dockerfile(content));
        }
        if let Some(content) = compose.content() {
            docker = docker.merge(parse_compose(content));
        }

        let mut description = info.description.unwrap_or_default();
        if description.is_empty()
            && let Some(summary) = readme.content().and_then(readme_summary)
        {
            description = summary;
        }

        let analysis = RepositoryAnalysis {
            repository: RepositorySummary {
                name: repo.repo.clone(),
                description,
                language: info.language.unwrap_or_default(),
                stars: info.stars,
                license: info.license.and_then(|l| l.spdx_id).unwrap_or_default(),
            },
            docker,
        };

        tracing::debug!(
            %repo,
            image = analysis.docker.image.as_deref().unwrap_or_default(),
            ports = analysis.docker.ports.len(),
            env = analysis.docker.env.len(),
            volumes = analysis.docker.volumes.len(),
            "repository inspected"
        );
        Ok(analysis)
    }
}
