use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::codec::decode_all,
    entities::{
        profile::{
            CompanyProfile, DeveloperListResponse, DeveloperProfile, DeveloperProfileResponse, DeveloperSearchQuery,
            MeResponse, Profile, ProfileRole, UpsertCompanyProfileRequest, UpsertDeveloperProfileRequest,
            UpsertProfileRequest,
        },
        skill::{AddUserSkillRequest, UserSkill},
    },
    errors::AppError,
    notifications::email::{dispatch, Notification, Notifier},
    repositories::{
        profile::{DeveloperFilter, ProfileRepository},
        project::ProjectRepository,
        skill::SkillRepository,
    },
    utils::social_card::{render_social_card, SocialCard},
};

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 50;

pub struct ProfileHandler<P, S, J>
where
    P: ProfileRepository,
    S: SkillRepository,
    J: ProjectRepository,
{
    pub profile_repo: P,
    pub skill_repo: S,
    pub project_repo: J,
    pub notifier: Arc<dyn Notifier>,
}

impl<P, S, J> ProfileHandler<P, S, J>
where
    P: ProfileRepository,
    S: SkillRepository,
    J: ProjectRepository,
{
    pub fn new(profile_repo: P, skill_repo: S, project_repo: J, notifier: Arc<dyn Notifier>) -> Self {
        ProfileHandler {
            profile_repo,
            skill_repo,
            project_repo,
            notifier,
        }
    }

    pub async fn get_profile(&self, user_id: &Uuid) -> Result<Profile, AppError> {
        let row = self
            .profile_repo
            .get_profile(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
        Ok(Profile::try_from(row)?)
    }

    pub async fn get_me(&self, user_id: &Uuid) -> Result<MeResponse, AppError> {
        let profile = self.get_profile(user_id).await?;

        let (developer, company) = match profile.role {
            ProfileRole::Developer => {
                let developer = match self.profile_repo.get_developer_profile(user_id).await? {
                    Some(row) => Some(DeveloperProfile::try_from(row)?),
                    None => None,
                };
                (developer, None)
            }
            ProfileRole::Company => {
                let company = self.profile_repo.get_company_profile(user_id).await?.map(CompanyProfile::from);
                (None, company)
            }
        };

        Ok(MeResponse {
            profile,
            developer,
            company,
        })
    }

    pub async fn upsert_profile(&self, user_id: &Uuid, request: UpsertProfileRequest) -> Result<Profile, AppError> {
        request.validate()?;

        if let Some(row) = self.profile_repo.get_profile(user_id).await? {
            let current = Profile::try_from(row)?.role;
            if current != request.role && self.has_role_profile(user_id, current).await? {
                tracing::warn!(%user_id, from = %current, to = %request.role, "Rejected role change");
                return Err(AppError::Conflict(format!(
                    "Cannot switch to {} once a {} profile exists",
                    request.role, current
                )));
            }
        }

        let created = self.profile_repo.upsert_profile(user_id, &request).await?;
        let profile = self.get_profile(user_id).await?;

        if created {
            tracing::info!(%user_id, role = %profile.role, "Profile created");
            dispatch(
                self.notifier.clone(),
                Notification::Welcome {
                    to: profile.email.clone(),
                    name: profile.full_name.clone(),
                    role: profile.role.to_string(),
                },
            );
        }

        Ok(profile)
    }

    pub async fn upsert_developer_profile(
        &self,
        user_id: &Uuid,
        request: UpsertDeveloperProfileRequest,
    ) -> Result<DeveloperProfile, AppError> {
        request.validate()?;
        self.require_role(user_id, ProfileRole::Developer).await?;

        self.profile_repo.upsert_developer_profile(user_id, &request).await?;
        self.developer_profile(user_id).await
    }

    pub async fn upsert_company_profile(
        &self,
        user_id: &Uuid,
        request: UpsertCompanyProfileRequest,
    ) -> Result<CompanyProfile, AppError> {
        request.validate()?;
        self.require_role(user_id, ProfileRole::Company).await?;

        let slug = request.slug();
        if slug.is_empty() {
            return Err(AppError::InvalidInput("Company name must contain letters or digits".to_string()));
        }

        self.profile_repo.upsert_company_profile(user_id, &slug, &request).await?;
        let row = self
            .profile_repo
            .get_company_profile(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Company profile not found".to_string()))?;
        Ok(CompanyProfile::from(row))
    }

    /// Public developer view: profile, skills, projects and rendered bio.
    pub async fn get_developer(&self, user_id: &Uuid) -> Result<DeveloperProfileResponse, AppError> {
        let profile = self.developer_profile(user_id).await?;
        let skills = self.list_user_skills(user_id).await?;
        let projects = self.project_repo.list_projects(user_id).await?;

        Ok(DeveloperProfileResponse::new(profile, skills, projects))
    }

    pub async fn search_developers(&self, query: DeveloperSearchQuery) -> Result<DeveloperListResponse, AppError> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

        let filter = DeveloperFilter {
            skill: query.skill.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            available: query.available,
            limit: i64::from(per_page),
            offset: i64::from(page - 1) * i64::from(per_page),
        };

        let developers = self.profile_repo.search_developers(&filter).await?;
        Ok(DeveloperListResponse {
            developers,
            page,
            per_page,
        })
    }

    pub async fn list_user_skills(&self, user_id: &Uuid) -> Result<Vec<UserSkill>, AppError> {
        let rows = self.skill_repo.list_user_skills(user_id).await?;
        Ok(decode_all(rows)?)
    }

    pub async fn add_user_skill(&self, user_id: &Uuid, request: AddUserSkillRequest) -> Result<Vec<UserSkill>, AppError> {
        request.validate()?;
        self.require_role(user_id, ProfileRole::Developer).await?;

        let assignment = request.into_assignment();
        self.skill_repo
            .save_assignments(user_id, std::slice::from_ref(&assignment), Default::default())
            .await?;

        self.list_user_skills(user_id).await
    }

    pub async fn remove_user_skill(&self, user_id: &Uuid, skill_id: &Uuid) -> Result<(), AppError> {
        if !self.skill_repo.remove_user_skill(user_id, skill_id).await? {
            return Err(AppError::NotFound("Skill not found on profile".to_string()));
        }
        Ok(())
    }

    pub async fn social_card(&self, user_id: &Uuid) -> Result<String, AppError> {
        let profile = self.developer_profile(user_id).await?;
        let skills = self.list_user_skills(user_id).await?;
        Ok(render_social_card(&SocialCard::from_profile(&profile, &skills)))
    }

    async fn developer_profile(&self, user_id: &Uuid) -> Result<DeveloperProfile, AppError> {
        let row = self
            .profile_repo
            .get_developer_profile(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Developer profile not found".to_string()))?;
        Ok(DeveloperProfile::try_from(row)?)
    }

    async fn has_role_profile(&self, user_id: &Uuid, role: ProfileRole) -> Result<bool, AppError> {
        Ok(match role {
            ProfileRole::Developer => self.profile_repo.get_developer_profile(user_id).await?.is_some(),
            ProfileRole::Company => self.profile_repo.get_company_profile(user_id).await?.is_some(),
        })
    }

    async fn require_role(&self, user_id: &Uuid, role: ProfileRole) -> Result<Profile, AppError> {
        let profile = self.get_profile(user_id).await?;
        if profile.role != role {
            tracing::warn!(%user_id, expected = %role, actual = %profile.role, "Role mismatch");
            return Err(AppError::ForbiddenAccess);
        }
        Ok(profile)
    }
}
