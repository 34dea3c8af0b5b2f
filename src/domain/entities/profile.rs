use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    domain::codec::{parse_enum, required, DecodeError},
    entities::{project::Project, skill::UserSkill},
    utils::markdown::safe_markdown_to_html,
};

// ───── Constants ──────────────────────────────────────────────────────
const MAX_NAME_LENGTH: u64 = 100;
const MAX_TITLE_LENGTH: u64 = 120;
const MAX_LOCATION_LENGTH: u64 = 120;
const MAX_BIO_LENGTH: u64 = 5000;
const COMPANY_SIZES: [&str; 5] = ["1-10", "11-50", "51-200", "201-1000", "1000+"];

static GITHUB_LOGIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9]|-(?:[A-Za-z0-9])){0,38}$").expect("valid github login regex")
});

// ───── Roles ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProfileRole {
    Developer,
    Company,
}

impl ProfileRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileRole::Developer => "developer",
            ProfileRole::Company => "company",
        }
    }
}

impl FromStr for ProfileRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "developer" => Ok(ProfileRole::Developer),
            "company" => Ok(ProfileRole::Company),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub role: String,
    pub full_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct DeveloperProfileRow {
    pub user_id: Uuid,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub title: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub years_experience: i32,
    pub available: bool,
    pub github_username: Option<String>,
    pub github_public_repos: Option<i32>,
    pub github_followers: Option<i32>,
    pub github_connected_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct CompanyProfileRow {
    pub user_id: Uuid,
    pub company_name: String,
    pub slug: String,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct DeveloperSummary {
    pub user_id: Uuid,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub title: String,
    pub location: Option<String>,
    pub years_experience: i32,
    pub available: bool,
}

// ───── Domain Models ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: Uuid,
    pub role: ProfileRole,
    pub full_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = DecodeError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        Ok(Profile {
            id: row.id,
            role: parse_enum("profile", "role", &row.role)?,
            full_name: row.full_name,
            email: row.email,
            avatar_url: row.avatar_url,
            is_admin: row.is_admin,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GitHubStats {
    pub username: String,
    pub public_repos: i32,
    pub followers: i32,
    pub connected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeveloperProfile {
    pub user_id: Uuid,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub title: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub years_experience: i32,
    pub available: bool,
    pub github: Option<GitHubStats>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DeveloperProfileRow> for DeveloperProfile {
    type Error = DecodeError;

    fn try_from(row: DeveloperProfileRow) -> Result<Self, Self::Error> {
        // Stats are written together with the username, never on their own.
        let github = match row.github_username {
            Some(username) => Some(GitHubStats {
                username,
                public_repos: required("developer_profile", "github_public_repos", row.github_public_repos)?,
                followers: required("developer_profile", "github_followers", row.github_followers)?,
                connected_at: required("developer_profile", "github_connected_at", row.github_connected_at)?,
            }),
            None => None,
        };

        Ok(DeveloperProfile {
            user_id: row.user_id,
            full_name: row.full_name,
            avatar_url: row.avatar_url,
            title: row.title,
            bio: row.bio,
            location: row.location,
            years_experience: row.years_experience,
            available: row.available,
            github,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyProfile {
    pub user_id: Uuid,
    pub company_name: String,
    pub slug: String,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<CompanyProfileRow> for CompanyProfile {
    fn from(row: CompanyProfileRow) -> Self {
        CompanyProfile {
            user_id: row.user_id,
            company_name: row.company_name,
            slug: row.slug,
            website: row.website,
            industry: row.industry,
            company_size: row.company_size,
            description: row.description,
            updated_at: row.updated_at,
        }
    }
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub profile: Profile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer: Option<DeveloperProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyProfile>,
}

#[derive(Debug, Serialize)]
pub struct DeveloperProfileResponse {
    #[serde(flatten)]
    pub profile: DeveloperProfile,
    pub bio_html: Option<String>,
    pub skills: Vec<UserSkill>,
    pub projects: Vec<Project>,
}

impl DeveloperProfileResponse {
    pub fn new(profile: DeveloperProfile, skills: Vec<UserSkill>, projects: Vec<Project>) -> Self {
        let bio_html = profile.bio.as_deref().map(safe_markdown_to_html);
        DeveloperProfileResponse {
            profile,
            bio_html,
            skills,
            projects,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeveloperListResponse {
    pub developers: Vec<DeveloperSummary>,
    pub page: u32,
    pub per_page: u32,
}

// ───── Input & Validation ───────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpsertProfileRequest {
    pub role: ProfileRole,

    #[validate(length(min = 1, max = MAX_NAME_LENGTH, message = "Name must be 1-100 characters"))]
    pub full_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(url(message = "Avatar must be a valid URL"))]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpsertDeveloperProfileRequest {
    #[validate(length(min = 2, max = MAX_TITLE_LENGTH, message = "Title must be 2-120 characters"))]
    pub title: String,

    #[validate(length(max = MAX_BIO_LENGTH, message = "Bio cannot exceed 5000 characters"))]
    pub bio: Option<String>,

    #[validate(length(max = MAX_LOCATION_LENGTH))]
    pub location: Option<String>,

    #[validate(range(min = 0, max = 60, message = "Years of experience must be between 0 and 60"))]
    #[serde(default)]
    pub years_experience: i32,

    #[serde(default = "default_true")]
    pub available: bool,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpsertCompanyProfileRequest {
    #[validate(length(min = 2, max = MAX_TITLE_LENGTH, message = "Company name must be 2-120 characters"))]
    pub company_name: String,

    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,

    #[validate(length(max = MAX_NAME_LENGTH))]
    pub industry: Option<String>,

    #[validate(custom(function = "validate_company_size"))]
    pub company_size: Option<String>,

    #[validate(length(max = MAX_BIO_LENGTH))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeveloperSearchQuery {
    pub skill: Option<String>,
    pub available: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// GitHub account details recorded when a developer connects GitHub.
#[derive(Debug, Clone)]
pub struct GitHubLink {
    pub username: String,
    pub public_repos: i32,
    pub followers: i32,
}

/// Returns true, used for serde default.
fn default_true() -> bool {
    true
}

fn validate_company_size(size: &str) -> Result<(), ValidationError> {
    if COMPANY_SIZES.contains(&size) {
        return Ok(());
    }
    let mut err = ValidationError::new("invalid_company_size");
    err.message = Some(format!("Company size must be one of {}", COMPANY_SIZES.join(", ")).into());
    Err(err)
}

pub fn is_valid_github_login(login: &str) -> bool {
    GITHUB_LOGIN.is_match(login)
}

impl UpsertCompanyProfileRequest {
    pub fn slug(&self) -> String {
        slug::slugify(&self.company_name)
    }
}
