use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::domain::codec::{parse_enum, DecodeError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SkillSource {
    Manual,
    Github,
}

impl SkillSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillSource::Manual => "manual",
            SkillSource::Github => "github",
        }
    }
}

impl FromStr for SkillSource {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(SkillSource::Manual),
            "github" => Ok(SkillSource::Github),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct UserSkillRow {
    pub skill_id: Uuid,
    pub name: String,
    pub proficiency_level: i16,
    pub verified: bool,
    pub source: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserSkill {
    pub skill_id: Uuid,
    pub name: String,
    pub proficiency_level: i16,
    pub verified: bool,
    pub source: SkillSource,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserSkillRow> for UserSkill {
    type Error = DecodeError;

    fn try_from(row: UserSkillRow) -> Result<Self, Self::Error> {
        Ok(UserSkill {
            skill_id: row.skill_id,
            name: row.name,
            proficiency_level: row.proficiency_level,
            verified: row.verified,
            source: parse_enum("user_skill", "source", &row.source)?,
            updated_at: row.updated_at,
        })
    }
}

/// One row to write into `user_skills`.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillAssignment {
    pub name: String,
    pub proficiency_level: i16,
    pub verified: bool,
    pub source: SkillSource,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct AddUserSkillRequest {
    #[validate(
        length(min = 1, max = 50, message = "Skill name must be 1-50 characters"),
        custom(function = "validate_skill_name")
    )]
    pub name: String,

    #[validate(range(min = 1, max = 5, message = "Proficiency level must be between 1 and 5"))]
    pub proficiency_level: i16,
}

impl AddUserSkillRequest {
    pub fn into_assignment(self) -> SkillAssignment {
        SkillAssignment {
            name: normalize_skill_name(&self.name),
            proficiency_level: self.proficiency_level,
            verified: false,
            source: SkillSource::Manual,
        }
    }
}

/// Collapses inner whitespace and trims, so "  Node.js " and "Node.js" resolve
/// to the same dictionary entry.
pub fn normalize_skill_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn validate_skill_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() || name.chars().any(|c| c.is_control()) {
        let mut err = ValidationError::new("invalid_skill_name");
        err.message = Some("Skill name cannot be blank or contain control characters".into());
        return Err(err);
    }
    Ok(())
}
