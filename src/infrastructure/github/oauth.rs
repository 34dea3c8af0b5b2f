use std::time::{Duration, Instant};

use dashmap::DashMap;
use rand::{distributions::Alphanumeric, Rng};
use reqwest::header;
use url::Url;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::{entities::github::AccessTokenResponse, github::client::GitHubError, settings::AppConfig};

pub const OAUTH_SCOPES: &str = "user:email read:user public_repo";
pub const STATE_TTL: Duration = Duration::from_secs(10 * 60);
const STATE_LENGTH: usize = 32;

/// Authorization-code flow against GitHub's OAuth endpoints.
#[derive(Clone)]
pub struct GitHubOAuth {
    client: reqwest::Client,
    client_id: String,
    client_secret: Zeroizing<String>,
    redirect_url: Option<String>,
    oauth_url: String,
    timeout: Duration,
}

impl std::fmt::Debug for GitHubOAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubOAuth")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_url", &self.redirect_url)
            .field("oauth_url", &self.oauth_url)
            .finish()
    }
}

impl GitHubOAuth {
    pub fn new(config: &AppConfig) -> Self {
        GitHubOAuth {
            client: reqwest::Client::new(),
            client_id: config.github_client_id.clone(),
            client_secret: Zeroizing::new(config.github_client_secret.clone()),
            redirect_url: config.github_redirect_url.clone(),
            oauth_url: config.github_oauth_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.http_timeout_secs),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    /// URL the browser is sent to so the user can grant access.
    pub fn authorize_url(&self, state: &str) -> Result<String, GitHubError> {
        if !self.is_configured() {
            return Err(GitHubError::NotConfigured);
        }

        let mut url = Url::parse(&format!("{}/login/oauth/authorize", self.oauth_url))
            .map_err(|_| GitHubError::NotConfigured)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("client_id", &self.client_id);
            query.append_pair("scope", OAUTH_SCOPES);
            query.append_pair("state", state);
            if let Some(redirect) = &self.redirect_url {
                query.append_pair("redirect_uri", redirect);
            }
        }
        Ok(url.into())
    }

    /// Trades the callback `code` for a user access token.
    pub async fn exchange_code(&self, code: &str) -> Result<Zeroizing<String>, GitHubError> {
        if !self.is_configured() {
            return Err(GitHubError::NotConfigured);
        }

        let mut form = vec![
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
        ];
        if let Some(redirect) = &self.redirect_url {
            form.push(("redirect_uri", redirect.as_str()));
        }

        let response = self
            .client
            .post(format!("{}/login/oauth/access_token", self.oauth_url))
            .header(header::ACCEPT, "application/json")
            .form(&form)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GitHubError::RemoteUnavailable(format!(
                "Token exchange responded with {}",
                response.status()
            )));
        }

        let body: AccessTokenResponse = response.json().await?;
        match body.access_token {
            Some(token) if !token.is_empty() => Ok(Zeroizing::new(token)),
            _ => {
                tracing::warn!(
                    error = body.error.as_deref().unwrap_or("unknown"),
                    description = body.error_description.as_deref().unwrap_or(""),
                    "GitHub token exchange rejected"
                );
                Err(GitHubError::Unauthorized)
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingState {
    user_id: Uuid,
    issued_at: Instant,
}

/// CSRF states handed out with authorize URLs, waiting for their callback.
#[derive(Debug)]
pub struct OAuthStateStore {
    pending: DashMap<String, PendingState>,
    ttl: Duration,
}

impl Default for OAuthStateStore {
    fn default() -> Self {
        Self::with_ttl(STATE_TTL)
    }
}

impl OAuthStateStore {
    pub fn with_ttl(ttl: Duration) -> Self {
        OAuthStateStore {
            pending: DashMap::new(),
            ttl,
        }
    }

    /// Issues a fresh random state bound to `user_id`.
    pub fn issue(&self, user_id: Uuid) -> String {
        let state: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(STATE_LENGTH)
            .map(char::from)
            .collect();

        self.pending.insert(
            state.clone(),
            PendingState {
                user_id,
                issued_at: Instant::now(),
            },
        );
        state
    }

    /// Removes `state` and returns the user it was issued to. A state can be
    /// consumed once.
    pub fn consume(&self, state: &str) -> Result<Uuid, GitHubError> {
        let (_, pending) = self.pending.remove(state).ok_or(GitHubError::InvalidState)?;
        if pending.issued_at.elapsed() > self.ttl {
            return Err(GitHubError::InvalidState);
        }
        Ok(pending.user_id)
    }

    pub fn prune_expired(&self) -> usize {
        let before = self.pending.len();
        self.pending.retain(|_, pending| pending.issued_at.elapsed() <= self.ttl);
        before.saturating_sub(self.pending.len())
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
