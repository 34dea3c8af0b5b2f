use async_trait::async_trait;

use crate::{
    entities::github::{GitHubRepository, GitHubUser},
    github::client::GitHubError,
};

/// Read access to the GitHub REST API on behalf of a user.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    async fn get_authenticated_user(&self, token: &str) -> Result<GitHubUser, GitHubError>;

    /// Repositories owned by the token's user, most recently updated first.
    async fn list_owned_repositories(&self, token: &str) -> Result<Vec<GitHubRepository>, GitHubError>;
}
