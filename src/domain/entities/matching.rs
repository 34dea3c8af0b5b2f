use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::domain::codec::{parse_enum, required, DecodeError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Mutual,
    Declined,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Mutual => "mutual",
            MatchStatus::Declined => "declined",
        }
    }

    /// Status after the latest responses of both sides.
    pub fn from_responses(developer: Option<ResponseStatus>, company: Option<ResponseStatus>) -> Self {
        match (developer, company) {
            (Some(ResponseStatus::Declined), _) | (_, Some(ResponseStatus::Declined)) => MatchStatus::Declined,
            (Some(ResponseStatus::Interested), Some(ResponseStatus::Interested)) => MatchStatus::Mutual,
            _ => MatchStatus::Pending,
        }
    }
}

impl FromStr for MatchStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(MatchStatus::Pending),
            "mutual" => Ok(MatchStatus::Mutual),
            "declined" => Ok(MatchStatus::Declined),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Interested,
    Declined,
}

impl ResponseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::Interested => "interested",
            ResponseStatus::Declined => "declined",
        }
    }
}

impl FromStr for ResponseStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "interested" => Ok(ResponseStatus::Interested),
            "declined" => Ok(ResponseStatus::Declined),
            _ => Err(()),
        }
    }
}

// ───── Database Models ───────────────────────────────────────────────

/// `matches` joined with both parties' display names.
#[derive(Debug, sqlx::FromRow)]
pub struct MatchRow {
    pub id: Uuid,
    pub developer_id: Uuid,
    pub company_id: Uuid,
    pub position_title: String,
    pub required_skills: Vec<String>,
    pub compatibility_score: i16,
    pub status: String,
    pub developer_name: Option<String>,
    pub company_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct MatchInsert {
    pub developer_id: Uuid,
    pub company_id: Uuid,
    pub position_title: String,
    pub required_skills: Vec<String>,
    pub compatibility_score: i16,
}

#[derive(Debug, sqlx::FromRow)]
pub struct MatchResponseRow {
    pub user_id: Uuid,
    pub status: String,
}

// ───── Domain Models ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Match {
    pub id: Uuid,
    pub developer_id: Uuid,
    pub developer_name: String,
    pub company_id: Uuid,
    pub company_name: String,
    pub position_title: String,
    pub required_skills: Vec<String>,
    pub compatibility_score: i16,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    pub fn is_party(&self, user_id: &Uuid) -> bool {
        self.developer_id == *user_id || self.company_id == *user_id
    }

    pub fn counterpart(&self, user_id: &Uuid) -> Uuid {
        if self.developer_id == *user_id {
            self.company_id
        } else {
            self.developer_id
        }
    }
}

impl TryFrom<MatchRow> for Match {
    type Error = DecodeError;

    fn try_from(row: MatchRow) -> Result<Self, Self::Error> {
        Ok(Match {
            id: row.id,
            developer_id: row.developer_id,
            developer_name: required("match", "developer_name", row.developer_name)?,
            company_id: row.company_id,
            company_name: required("match", "company_name", row.company_name)?,
            position_title: row.position_title,
            required_skills: row.required_skills,
            compatibility_score: row.compatibility_score,
            status: parse_enum("match", "status", &row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchResponse {
    pub user_id: Uuid,
    pub status: ResponseStatus,
}

impl TryFrom<MatchResponseRow> for MatchResponse {
    type Error = DecodeError;

    fn try_from(row: MatchResponseRow) -> Result<Self, Self::Error> {
        Ok(MatchResponse {
            user_id: row.user_id,
            status: parse_enum("match_response", "status", &row.status)?,
        })
    }
}

// ───── Input & Validation ───────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NewMatchRequest {
    pub developer_id: Uuid,

    #[validate(length(min = 2, max = 120, message = "Position title must be 2-120 characters"))]
    pub position_title: String,

    #[validate(custom(function = "validate_required_skills"))]
    pub required_skills: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RespondToMatchRequest {
    pub status: ResponseStatus,
}

#[derive(Debug, Serialize)]
pub struct MatchCreatedResponse {
    pub id: Uuid,
    pub compatibility_score: i16,
}

#[derive(Debug, Serialize)]
pub struct MatchRespondedResponse {
    #[serde(rename = "match")]
    pub matched: Match,
    pub conversation_id: Option<Uuid>,
}

fn validate_required_skills(skills: &[String]) -> Result<(), ValidationError> {
    if skills.is_empty() || skills.len() > 20 {
        let mut err = ValidationError::new("invalid_required_skills");
        err.message = Some("Between 1 and 20 required skills must be listed".into());
        return Err(err);
    }
    if skills.iter().any(|s| s.trim().is_empty()) {
        let mut err = ValidationError::new("blank_required_skill");
        err.message = Some("Required skills cannot be blank".into());
        return Err(err);
    }
    Ok(())
}
