#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{url} not found")]
    NotFound { url: String },

    #[error("request to {url} failed")]
    Request {
        url: String,
        source: reqwest::Error,
    },

    #[error("GitHub returned {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("unexpected response body from {url}")]
    Decode {
        url: String,
        source: reqwest::Error,
    },

    #[error("failed to build GitHub client")]
    Client { source: reqwest::Error },

    #[error("GITHUB_TOKEN is not a valid header value")]
    InvalidToken,

    #[error("cannot build a request URL from {url}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("Repository URL is required")]
    MissingUrl,

    #[error("Invalid GitHub URL: {0}")]
    InvalidUrl(String),

    #[error("repository {repo} not found")]
    RepositoryNotFound { repo: String },

    #[error("failed to fetch repository {repo}")]
    Fetch { repo: String, source: FetchError },
}
