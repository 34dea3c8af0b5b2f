use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ───── GitHub API Models ─────────────────────────────────────────────

/// Repository as returned by `GET /user/repos`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitHubRepository {
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    /// Primary language as detected by GitHub.
    #[serde(default)]
    pub language: Option<String>,
    /// GitHub's size figure for the repository (kilobytes of packed content).
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub languages_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Subset of `GET /user` used to enrich the developer profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitHubUser {
    pub id: i64,
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub public_repos: i32,
    #[serde(default)]
    pub followers: i32,
}

#[derive(Debug, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

// ───── Skill Validation ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ProjectComplexity {
    Basic,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillEvidence {
    pub repositories: Vec<String>,
    pub lines_of_code: u64,
    pub recent_usage: bool,
    pub project_complexity: ProjectComplexity,
}

/// A skill claim backed by public repository activity. Derived on every
/// analysis run and never stored as its own row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillValidation {
    pub skill: String,
    pub confidence: u8,
    pub evidence: SkillEvidence,
}

/// How validated skills are written to `user_skills`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SaveMode {
    /// Upsert by skill and keep skills that did not reappear.
    #[default]
    Merge,
    /// Delete every stored assignment and insert the new set.
    Replace,
}

// ───── API Request / Response Models ─────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ValidateSkillsRequest {
    /// Provider token obtained from the GitHub OAuth step.
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub save: bool,
    #[serde(default)]
    pub mode: SaveMode,
}

#[derive(Debug, Serialize)]
pub struct SkillValidationResponse {
    pub validations: Vec<SkillValidation>,
    pub saved: usize,
}

#[derive(Debug, Serialize)]
pub struct GitHubConnectResponse {
    pub authorize_url: String,
    pub state: String,
}

#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: String,
    pub state: String,
}

#[derive(Debug, Serialize)]
pub struct GitHubConnectedResponse {
    pub user_id: Uuid,
    pub github_username: String,
    pub validations: Vec<SkillValidation>,
    pub saved: usize,
}
