use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::InspectError;

static GITHUB_REPO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"github\.com[/:]([^/\s]+)/([^/\s?#]+)").expect("repository pattern is valid")
});

/// `owner/repo` on GitHub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    /// Extract the repository from any URL containing
    /// `github.com/<owner>/<repo>`. A trailing `.git` is dropped.
    pub fn parse(url: &str) -> Result<Self, InspectError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(InspectError::MissingUrl);
        }
        let caps = GITHUB_REPO
            .captures(url)
            .ok_or_else(|| InspectError::InvalidUrl(url.to_owned()))?;
        let repo = caps[2].strip_suffix(".git").unwrap_or(&caps[2]);
        if repo.is_empty() {
            return Err(InspectError::InvalidUrl(url.to_owned()));
        }
        Ok(Self {
            owner: caps[1].to_owned(),
            repo: repo.to_owned(),
        })
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
