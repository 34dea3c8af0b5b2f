//! GitHub REST API client used by skill validation.
//!
//! A 401 means the user must reconnect GitHub. Any other failure is reported
//! as GitHub being unreachable. Nothing is retried.

use std::time::Duration;

use async_trait::async_trait;
use derive_more::Display;
use reqwest::{header, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    domain::skill_scoring::MAX_REPOSITORIES,
    entities::github::{GitHubRepository, GitHubUser},
    repositories::github::GitHubApi,
    settings::AppConfig,
};

const USER_AGENT: &str = concat!("chosn-backend/", env!("CARGO_PKG_VERSION"));
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum GitHubError {
    #[display("GitHub rejected the access token")]
    Unauthorized,

    #[display("GitHub is unavailable: {_0}")]
    RemoteUnavailable(String),

    #[display("Unknown or expired OAuth state")]
    InvalidState,

    #[display("GitHub OAuth is not configured")]
    NotConfigured,
}

impl std::error::Error for GitHubError {}

impl From<reqwest::Error> for GitHubError {
    fn from(err: reqwest::Error) -> Self {
        GitHubError::RemoteUnavailable(err.to_string())
    }
}

#[derive(Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    api_url: String,
    timeout: Duration,
}

impl GitHubClient {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(
            reqwest::Client::new(),
            &config.github_api_url,
            Duration::from_secs(config.http_timeout_secs),
        )
    }

    /// Reuses an existing [`reqwest::Client`] against any API base URL.
    pub fn with_client(client: reqwest::Client, api_url: &str, timeout: Duration) -> Self {
        GitHubClient {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, token: &str) -> Result<T, GitHubError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(GitHubError::Unauthorized);
        }

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .header(header::ACCEPT, GITHUB_MEDIA_TYPE)
            .header(header::USER_AGENT, USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json::<T>().await?),
            StatusCode::UNAUTHORIZED => Err(GitHubError::Unauthorized),
            status => {
                tracing::warn!(%status, url, "GitHub request failed");
                Err(GitHubError::RemoteUnavailable(format!("GitHub responded with {status}")))
            }
        }
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn get_authenticated_user(&self, token: &str) -> Result<GitHubUser, GitHubError> {
        let url = format!("{}/user", self.api_url);
        self.get_json(&url, token).await
    }

    async fn list_owned_repositories(&self, token: &str) -> Result<Vec<GitHubRepository>, GitHubError> {
        let url = format!(
            "{}/user/repos?type=owner&sort=updated&per_page={}",
            self.api_url, MAX_REPOSITORIES
        );
        let mut repositories: Vec<GitHubRepository> = self.get_json(&url, token).await?;
        repositories.truncate(MAX_REPOSITORIES);
        Ok(repositories)
    }
}
