use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::profile::{
        CompanyProfileRow, DeveloperProfileRow, DeveloperSummary, GitHubLink, ProfileRow,
        UpsertCompanyProfileRequest, UpsertDeveloperProfileRequest, UpsertProfileRequest,
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxProfileRepo,
};

const DEVELOPER_COLUMNS: &str = r#"
    d.user_id, p.full_name, p.avatar_url, d.title, d.bio, d.location,
    d.years_experience, d.available, d.github_username, d.github_public_repos,
    d.github_followers, d.github_connected_at, d.updated_at
"#;

/// Filters for the public developer directory.
#[derive(Debug, Clone, Default)]
pub struct DeveloperFilter {
    pub skill: Option<String>,
    pub available: Option<bool>,
    pub limit: i64,
    pub offset: i64,
}

/// Row counts shown on the admin dashboard.
#[derive(Debug, Clone, Default, serde::Serialize, sqlx::FromRow)]
pub struct PlatformCounts {
    pub developers: i64,
    pub companies: i64,
    pub conversations: i64,
    pub messages: i64,
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    async fn get_profile(&self, id: &Uuid) -> Result<Option<ProfileRow>, AppError>;
    /// Inserts or updates the base profile. Returns `true` when the row was created.
    async fn upsert_profile(&self, id: &Uuid, profile: &UpsertProfileRequest) -> Result<bool, AppError>;
    async fn get_developer_profile(&self, user_id: &Uuid) -> Result<Option<DeveloperProfileRow>, AppError>;
    async fn upsert_developer_profile(
        &self,
        user_id: &Uuid,
        profile: &UpsertDeveloperProfileRequest,
    ) -> Result<(), AppError>;
    async fn get_company_profile(&self, user_id: &Uuid) -> Result<Option<CompanyProfileRow>, AppError>;
    async fn upsert_company_profile(
        &self,
        user_id: &Uuid,
        slug: &str,
        profile: &UpsertCompanyProfileRequest,
    ) -> Result<(), AppError>;
    async fn link_github(&self, user_id: &Uuid, link: &GitHubLink) -> Result<(), AppError>;
    async fn search_developers(&self, filter: &DeveloperFilter) -> Result<Vec<DeveloperSummary>, AppError>;
    async fn platform_counts(&self) -> Result<PlatformCounts, AppError>;
}

impl SqlxProfileRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxProfileRepo { pool }
    }
}

#[async_trait]
impl ProfileRepository for SqlxProfileRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn get_profile(&self, id: &Uuid) -> Result<Option<ProfileRow>, AppError> {
        sqlx::query_as::<_, ProfileRow>(
            "SELECT id, role, full_name, email, avatar_url, is_admin, created_at, updated_at
             FROM profiles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn upsert_profile(&self, id: &Uuid, profile: &UpsertProfileRequest) -> Result<bool, AppError> {
        // xmax is zero only for freshly inserted tuples
        let inserted: bool = sqlx::query_scalar(
            r#"INSERT INTO profiles (id, role, full_name, email, avatar_url)
               VALUES ($1, $2, $3, $4, $5)
               ON CONFLICT (id) DO UPDATE SET
                   role = EXCLUDED.role,
                   full_name = EXCLUDED.full_name,
                   email = EXCLUDED.email,
                   avatar_url = EXCLUDED.avatar_url,
                   updated_at = NOW()
               RETURNING (xmax = 0)"#,
        )
        .bind(id)
        .bind(profile.role.as_str())
        .bind(profile.full_name.trim())
        .bind(&profile.email)
        .bind(&profile.avatar_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn get_developer_profile(&self, user_id: &Uuid) -> Result<Option<DeveloperProfileRow>, AppError> {
        let sql = format!(
            "SELECT {DEVELOPER_COLUMNS} FROM developer_profiles d
             JOIN profiles p ON p.id = d.user_id
             WHERE d.user_id = $1"
        );
        sqlx::query_as::<_, DeveloperProfileRow>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn upsert_developer_profile(
        &self,
        user_id: &Uuid,
        profile: &UpsertDeveloperProfileRequest,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"INSERT INTO developer_profiles (user_id, title, bio, location, years_experience, available)
               VALUES ($1, $2, $3, $4, $5, $6)
               ON CONFLICT (user_id) DO UPDATE SET
                   title = EXCLUDED.title,
                   bio = EXCLUDED.bio,
                   location = EXCLUDED.location,
                   years_experience = EXCLUDED.years_experience,
                   available = EXCLUDED.available,
                   updated_at = NOW()"#,
        )
        .bind(user_id)
        .bind(profile.title.trim())
        .bind(&profile.bio)
        .bind(&profile.location)
        .bind(profile.years_experience)
        .bind(profile.available)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_company_profile(&self, user_id: &Uuid) -> Result<Option<CompanyProfileRow>, AppError> {
        sqlx::query_as::<_, CompanyProfileRow>(
            "SELECT user_id, company_name, slug, website, industry, company_size, description, updated_at
             FROM company_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn upsert_company_profile(
        &self,
        user_id: &Uuid,
        slug: &str,
        profile: &UpsertCompanyProfileRequest,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"INSERT INTO company_profiles (user_id, company_name, slug, website, industry, company_size, description)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               ON CONFLICT (user_id) DO UPDATE SET
                   company_name = EXCLUDED.company_name,
                   slug = EXCLUDED.slug,
                   website = EXCLUDED.website,
                   industry = EXCLUDED.industry,
                   company_size = EXCLUDED.company_size,
                   description = EXCLUDED.description,
                   updated_at = NOW()"#,
        )
        .bind(user_id)
        .bind(profile.company_name.trim())
        .bind(slug)
        .bind(&profile.website)
        .bind(&profile.industry)
        .bind(&profile.company_size)
        .bind(&profile.description)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                AppError::Conflict("A company with this name already exists".to_string())
            }
            _ => AppError::from(e),
        })?;

        Ok(())
    }

    async fn link_github(&self, user_id: &Uuid, link: &GitHubLink) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"UPDATE developer_profiles SET
                   github_username = $2,
                   github_public_repos = $3,
                   github_followers = $4,
                   github_connected_at = NOW(),
                   updated_at = NOW()
               WHERE user_id = $1"#,
        )
        .bind(user_id)
        .bind(&link.username)
        .bind(link.public_repos)
        .bind(link.followers)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Developer profile not found".to_string()));
        }
        Ok(())
    }

    async fn search_developers(&self, filter: &DeveloperFilter) -> Result<Vec<DeveloperSummary>, AppError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT d.user_id, p.full_name, p.avatar_url, d.title, d.location, d.years_experience, d.available
             FROM developer_profiles d
             JOIN profiles p ON p.id = d.user_id
             WHERE TRUE",
        );

        if let Some(available) = filter.available {
            builder.push(" AND d.available = ").push_bind(available);
        }

        if let Some(skill) = filter.skill.as_deref() {
            builder
                .push(
                    " AND EXISTS (SELECT 1 FROM user_skills us JOIN skills s ON s.id = us.skill_id
                      WHERE us.user_id = d.user_id AND lower(s.name) = lower(",
                )
                .push_bind(skill.to_string())
                .push("))");
        }

        builder
            .push(" ORDER BY d.updated_at DESC, d.user_id LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        builder
            .build_query_as::<DeveloperSummary>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn platform_counts(&self) -> Result<PlatformCounts, AppError> {
        sqlx::query_as::<_, PlatformCounts>(
            r#"SELECT
                   (SELECT COUNT(*) FROM profiles WHERE role = 'developer') AS developers,
                   (SELECT COUNT(*) FROM profiles WHERE role = 'company') AS companies,
                   (SELECT COUNT(*) FROM conversations) AS conversations,
                   (SELECT COUNT(*) FROM messages) AS messages"#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }
}
