use chrono::Utc;
use uuid::Uuid;

use crate::{
    domain::skill_scoring::{proficiency_level, score_repositories, top_validations, MAX_SAVED_SKILLS},
    entities::{
        github::{GitHubConnectedResponse, SaveMode, SkillValidation, SkillValidationResponse, ValidateSkillsRequest},
        profile::{is_valid_github_login, GitHubLink},
        skill::{SkillAssignment, SkillSource},
    },
    errors::AppError,
    github::client::GitHubError,
    repositories::{github::GitHubApi, profile::ProfileRepository, skill::SkillRepository},
};

pub struct SkillValidationHandler<G, P, S>
where
    G: GitHubApi,
    P: ProfileRepository,
    S: SkillRepository,
{
    pub github: G,
    pub profile_repo: P,
    pub skill_repo: S,
}

impl<G, P, S> SkillValidationHandler<G, P, S>
where
    G: GitHubApi,
    P: ProfileRepository,
    S: SkillRepository,
{
    pub fn new(github: G, profile_repo: P, skill_repo: S) -> Self {
        SkillValidationHandler {
            github,
            profile_repo,
            skill_repo,
        }
    }

    /// Scores the skills evidenced by the token owner's repositories.
    pub async fn analyze(&self, token: &str) -> Result<Vec<SkillValidation>, GitHubError> {
        let repositories = self.github.list_owned_repositories(token).await?;
        let validations = score_repositories(&repositories, Utc::now());

        tracing::info!(
            repositories = repositories.len(),
            skills = validations.len(),
            "Analyzed GitHub repositories"
        );
        Ok(validations)
    }

    /// Writes the top validations as verified skills. Returns how many were saved.
    pub async fn save_to_profile(
        &self,
        user_id: &Uuid,
        validations: &[SkillValidation],
        mode: SaveMode,
    ) -> Result<usize, AppError> {
        let assignments: Vec<SkillAssignment> = top_validations(validations, MAX_SAVED_SKILLS)
            .iter()
            .map(|v| SkillAssignment {
                name: v.skill.clone(),
                proficiency_level: proficiency_level(v.confidence),
                verified: true,
                source: SkillSource::Github,
            })
            .collect();

        if assignments.is_empty() && mode == SaveMode::Merge {
            return Ok(0);
        }

        let saved = self.skill_repo.save_assignments(user_id, &assignments, mode).await?;
        tracing::info!(%user_id, saved, ?mode, "Saved GitHub-validated skills");
        Ok(saved)
    }

    pub async fn validate(
        &self,
        user_id: &Uuid,
        request: ValidateSkillsRequest,
    ) -> Result<SkillValidationResponse, AppError> {
        let token = request
            .access_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(GitHubError::Unauthorized)?;

        let validations = self.analyze(token).await?;

        let saved = if request.save {
            self.ensure_developer(user_id).await?;
            self.save_to_profile(user_id, &validations, request.mode).await?
        } else {
            0
        };

        Ok(SkillValidationResponse { validations, saved })
    }

    /// Links the GitHub account behind `token` to the developer profile and
    /// merges its validated skills.
    pub async fn connect(&self, user_id: &Uuid, token: &str) -> Result<GitHubConnectedResponse, AppError> {
        self.ensure_developer(user_id).await?;

        let (user, validations) = tokio::join!(self.github.get_authenticated_user(token), self.analyze(token));
        let user = user?;
        let validations = validations?;

        if !is_valid_github_login(&user.login) {
            return Err(AppError::RemoteUnavailable(format!(
                "GitHub returned an invalid login: {}",
                user.login
            )));
        }

        self.profile_repo
            .link_github(
                user_id,
                &GitHubLink {
                    username: user.login.clone(),
                    public_repos: user.public_repos,
                    followers: user.followers,
                },
            )
            .await?;

        let saved = self.save_to_profile(user_id, &validations, SaveMode::Merge).await?;

        Ok(GitHubConnectedResponse {
            user_id: *user_id,
            github_username: user.login,
            validations,
            saved,
        })
    }

    async fn ensure_developer(&self, user_id: &Uuid) -> Result<(), AppError> {
        match self.profile_repo.get_developer_profile(user_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(
                "Create a developer profile before saving skills".to_string(),
            )),
        }
    }
}
