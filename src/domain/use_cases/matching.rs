use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::{codec::decode_all, compatibility::compatibility_score},
    entities::{
        matching::{
            Match, MatchCreatedResponse, MatchInsert, MatchRespondedResponse, NewMatchRequest, ResponseStatus,
            RespondToMatchRequest,
        },
        profile::{Profile, ProfileRole},
        skill::UserSkill,
    },
    errors::AppError,
    notifications::email::{dispatch, Notification, Notifier},
    repositories::{matching::MatchRepository, profile::ProfileRepository, skill::SkillRepository},
};

pub struct MatchHandler<M, P, S>
where
    M: MatchRepository,
    P: ProfileRepository,
    S: SkillRepository,
{
    pub match_repo: M,
    pub profile_repo: P,
    pub skill_repo: S,
    pub notifier: Arc<dyn Notifier>,
}

impl<M, P, S> MatchHandler<M, P, S>
where
    M: MatchRepository,
    P: ProfileRepository,
    S: SkillRepository,
{
    pub fn new(match_repo: M, profile_repo: P, skill_repo: S, notifier: Arc<dyn Notifier>) -> Self {
        MatchHandler {
            match_repo,
            profile_repo,
            skill_repo,
            notifier,
        }
    }

    /// Proposes a position to a developer. Only companies with a company
    /// profile may do so.
    pub async fn create_match(&self, company_id: &Uuid, request: NewMatchRequest) -> Result<MatchCreatedResponse, AppError> {
        request.validate()?;

        let company = self
            .profile_repo
            .get_profile(company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
        if Profile::try_from(company)?.role != ProfileRole::Company {
            return Err(AppError::ForbiddenAccess);
        }
        if self.profile_repo.get_company_profile(company_id).await?.is_none() {
            return Err(AppError::InvalidInput(
                "Create a company profile before proposing matches".to_string(),
            ));
        }

        if self.profile_repo.get_developer_profile(&request.developer_id).await?.is_none() {
            return Err(AppError::NotFound("Developer not found".to_string()));
        }

        let skills: Vec<UserSkill> = decode_all(self.skill_repo.list_user_skills(&request.developer_id).await?)?;
        let required_skills: Vec<String> = request.required_skills.iter().map(|s| s.trim().to_string()).collect();
        let score = compatibility_score(&required_skills, &skills);

        let id = self
            .match_repo
            .create_match(&MatchInsert {
                developer_id: request.developer_id,
                company_id: *company_id,
                position_title: request.position_title.trim().to_string(),
                required_skills,
                compatibility_score: score,
            })
            .await?;

        tracing::info!(match_id = %id, %company_id, developer_id = %request.developer_id, score, "Match created");
        Ok(MatchCreatedResponse {
            id,
            compatibility_score: score,
        })
    }

    pub async fn list_matches(&self, user_id: &Uuid) -> Result<Vec<Match>, AppError> {
        let rows = self.match_repo.list_matches_for(user_id).await?;
        Ok(decode_all(rows)?)
    }

    pub async fn get_match(&self, match_id: &Uuid, user_id: &Uuid) -> Result<Match, AppError> {
        let matched = self.load_match(match_id).await?;
        if !matched.is_party(user_id) {
            return Err(AppError::ForbiddenAccess);
        }
        Ok(matched)
    }

    pub async fn respond(
        &self,
        match_id: &Uuid,
        user_id: &Uuid,
        request: RespondToMatchRequest,
    ) -> Result<MatchRespondedResponse, AppError> {
        let current = self.get_match(match_id, user_id).await?;

        let recorded = self.match_repo.record_response(match_id, user_id, request.status).await?;
        tracing::info!(%match_id, %user_id, response = request.status.as_str(), status = recorded.status.as_str(), "Match response recorded");

        if request.status == ResponseStatus::Interested {
            self.notify_interest(&current, user_id).await;
        }

        let matched = self.load_match(match_id).await?;
        Ok(MatchRespondedResponse {
            matched,
            conversation_id: recorded.conversation_id,
        })
    }

    async fn load_match(&self, match_id: &Uuid) -> Result<Match, AppError> {
        let row = self
            .match_repo
            .get_match(match_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Match not found".to_string()))?;
        Ok(Match::try_from(row)?)
    }

    async fn notify_interest(&self, matched: &Match, responder_id: &Uuid) {
        let recipient_id = matched.counterpart(responder_id);
        let from_name = if matched.developer_id == *responder_id {
            matched.developer_name.clone()
        } else {
            matched.company_name.clone()
        };

        match self.profile_repo.get_profile(&recipient_id).await {
            Ok(Some(recipient)) => dispatch(
                self.notifier.clone(),
                Notification::MatchInterest {
                    to: recipient.email,
                    from_name,
                    match_id: matched.id,
                    position_title: matched.position_title.clone(),
                },
            ),
            Ok(None) => tracing::warn!(%recipient_id, "Match counterpart has no profile"),
            Err(e) => tracing::warn!(%recipient_id, error = %e, "Could not load match counterpart"),
        }
    }
}
