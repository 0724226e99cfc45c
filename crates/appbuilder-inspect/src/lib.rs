//! GitHub repository inspection for the Olares app builder.
//!
//! [`RepoInspector::analyze`] looks up a repository, then fetches its
//! `Dockerfile`, `docker-compose.yml` and README concurrently. Each of the
//! three is an independent [`Artifact`]: a missing or unreadable file only
//! removes the hints it would have contributed. Compose hints override
//! Dockerfile hints field by field.
//!
//! The host is reached through [`RepoFetcher`]; [`GithubFetcher`] talks to
//! the GitHub REST API.

pub mod analysis;
pub mod error;
pub mod fetcher;
pub mod hints;
pub mod inspector;
pub mod repo;

pub use analysis::{RepositoryAnalysis, RepositorySummary, readme_summary, split_image};
pub use error::{FetchError, InspectError};
pub use fetcher::{GithubFetcher, License, RepoFetcher, RepoInfo};
pub use hints::{
    DetectedEnv, DetectedPort, DetectedVolume, DockerHints, guess_port_name, parse_compose,
    parse_dockerfile,
};
pub use inspector::{Artifact, RepoInspector};
pub use repo::RepoRef;
