use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

const MAX_TECHNOLOGIES: usize = 15;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    pub repository_url: Option<String>,
    pub technologies: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NewProjectRequest {
    #[validate(length(min = 3, max = 120, message = "Title must be 3-120 characters"))]
    pub title: String,

    #[validate(length(min = 10, max = 2000, message = "Description must be 10-2000 characters"))]
    pub description: String,

    #[validate(url(message = "Project URL must be valid"))]
    pub url: Option<String>,

    #[validate(url(message = "Repository URL must be valid"))]
    pub repository_url: Option<String>,

    #[validate(custom(function = "validate_technologies"))]
    #[serde(default)]
    pub technologies: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectCreatedResponse {
    pub id: Uuid,
    pub message: String,
}

fn validate_technologies(technologies: &[String]) -> Result<(), ValidationError> {
    if technologies.len() > MAX_TECHNOLOGIES {
        let mut err = ValidationError::new("too_many_technologies");
        err.message = Some(format!("At most {} technologies allowed", MAX_TECHNOLOGIES).into());
        return Err(err);
    }
    if technologies.iter().any(|t| t.trim().is_empty() || t.len() > 40) {
        let mut err = ValidationError::new("invalid_technology");
        err.message = Some("Technologies must be 1-40 characters".into());
        return Err(err);
    }
    Ok(())
}
