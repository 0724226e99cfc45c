use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use crate::error::FetchError;
use crate::repo::RepoRef;

const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw+json";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const CLIENT_USER_AGENT: &str = concat!("appbuilder/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Repository metadata as reported by the hosting API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RepoInfo {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default, rename = "stargazers_count")]
    pub stars: u64,
    #[serde(default)]
    pub license: Option<License>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct License {
    #[serde(default)]
    pub spdx_id: Option<String>,
}

/// Abstraction over the repository host for testability.
///
/// Production code uses [`GithubFetcher`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait RepoFetcher: Send + Sync {
    /// Repository metadata.
    async fn repository(&self, repo: &RepoRef) -> Result<RepoInfo, FetchError>;

    /// Raw content of `path` at `branch`.
    async fn file(&self, repo: &RepoRef, path: &str, branch: &str) -> Result<String, FetchError>;

    /// Raw content of the repository README.
    async fn readme(&self, repo: &RepoRef) -> Result<String, FetchError>;
}

/// GitHub REST API fetcher.
#[derive(Debug, Clone)]
pub struct GithubFetcher {
    api_url: String,
    client: Client,
}

impl GithubFetcher {
    /// Build a fetcher against `api_url` (no trailing slash needed),
    /// authenticating with `token` when given.
    pub fn new(api_url: &str, token: Option<&SecretString>) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|_| FetchError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FetchError::Client { source: e })?;

        tracing::debug!(api_url, authenticated = token.is_some(), "GitHub fetcher ready");
        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_owned(),
            client,
        })
    }

    async fn get(&self, url: String, accept: &'static str) -> Result<reqwest::Response, FetchError> {
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.clone(),
                source: e,
            })?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(FetchError::NotFound { url }),
            status => Err(FetchError::Status {
                url,
                status: status.as_u16(),
            }),
        }
    }

    async fn get_text(&self, url: String) -> Result<String, FetchError> {
        let response = self.get(url.clone(), RAW_MEDIA_TYPE).await?;
        response
            .text()
            .await
            .map_err(|e| FetchError::Decode { url, source: e })
    }
}

impl RepoFetcher for GithubFetcher {
    async fn repository(&self, repo: &RepoRef) -> Result<RepoInfo, FetchError> {
        let url = format!("{}/repos/{}/{}", self.api_url, repo.owner, repo.repo);
        let response = self.get(url.clone(), JSON_MEDIA_TYPE).await?;
        response
            .json()
            .await
            .map_err(|e| FetchError::Decode { url, source: e })
    }

    async fn file(&self, repo: &RepoRef, path: &str, branch: &str) -> Result<String, FetchError> {
        let url = contents_url(&self.api_url, repo, path, branch)?;
        self.get_text(url.into()).await
    }

    async fn readme(&self, repo: &RepoRef) -> Result<String, FetchError> {
        let url = format!("{}/repos/{}/{}/readme", self.api_url, repo.owner, repo.repo);
        self.get_text(url).await
    }
}

/// `{api}/repos/{owner}/{repo}/contents/{path}?ref={branch}` with the path
/// segments and the branch percent-encoded.
fn contents_url(
    api_url: &str,
    repo: &RepoRef,
    path: &str,
    branch: &str,
) -> Result<Url, FetchError> {
    let base = format!("{api_url}/repos/{}/{}/contents", repo.owner, repo.repo);
    let invalid = |source| FetchError::InvalidUrl {
        url: base.clone(),
        source,
    };

    let mut url = Url::parse(&base).map_err(invalid)?;
    url.path_segments_mut()
        .map_err(|()| invalid(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .extend(path.split('/').filter(|segment| !segment.is_empty()));
    url.query_pairs_mut().append_pair("ref", branch);
    Ok(url)
}
