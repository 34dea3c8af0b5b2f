use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::{
        github::SaveMode,
        skill::{SkillAssignment, UserSkillRow},
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxSkillRepo,
};

#[async_trait]
pub trait SkillRepository: Send + Sync {
    async fn list_user_skills(&self, user_id: &Uuid) -> Result<Vec<UserSkillRow>, AppError>;
    /// Writes all assignments in one transaction. `Replace` clears the user's
    /// existing skills first; `Merge` upserts by skill and leaves the rest.
    async fn save_assignments(
        &self,
        user_id: &Uuid,
        assignments: &[SkillAssignment],
        mode: SaveMode,
    ) -> Result<usize, AppError>;
    async fn remove_user_skill(&self, user_id: &Uuid, skill_id: &Uuid) -> Result<bool, AppError>;
}

impl SqlxSkillRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxSkillRepo { pool }
    }
}

#[async_trait]
impl SkillRepository for SqlxSkillRepo {
    async fn list_user_skills(&self, user_id: &Uuid) -> Result<Vec<UserSkillRow>, AppError> {
        sqlx::query_as::<_, UserSkillRow>(
            r#"SELECT us.skill_id, s.name, us.proficiency_level, us.verified, us.source, us.updated_at
               FROM user_skills us
               JOIN skills s ON s.id = us.skill_id
               WHERE us.user_id = $1
               ORDER BY us.verified DESC, us.proficiency_level DESC, s.name"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn save_assignments(
        &self,
        user_id: &Uuid,
        assignments: &[SkillAssignment],
        mode: SaveMode,
    ) -> Result<usize, AppError> {
        let mut tx = self.pool.begin().await?;

        if mode == SaveMode::Replace {
            let removed = sqlx::query("DELETE FROM user_skills WHERE user_id = $1")
                .bind(user_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            tracing::debug!(%user_id, removed, "Cleared skills before replace");
        }

        for assignment in assignments {
            // The no-op update makes RETURNING yield the existing id on conflict.
            let skill_id: Uuid = sqlx::query_scalar(
                r#"INSERT INTO skills (name) VALUES ($1)
                   ON CONFLICT ((lower(name))) DO UPDATE SET name = skills.name
                   RETURNING id"#,
            )
            .bind(&assignment.name)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query(
                r#"INSERT INTO user_skills (user_id, skill_id, proficiency_level, verified, source)
                   VALUES ($1, $2, $3, $4, $5)
                   ON CONFLICT (user_id, skill_id) DO UPDATE SET
                       proficiency_level = EXCLUDED.proficiency_level,
                       verified = user_skills.verified OR EXCLUDED.verified,
                       source = EXCLUDED.source,
                       updated_at = NOW()"#,
            )
            .bind(user_id)
            .bind(skill_id)
            .bind(assignment.proficiency_level)
            .bind(assignment.verified)
            .bind(assignment.source.as_str())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(assignments.len())
    }

    async fn remove_user_skill(&self, user_id: &Uuid, skill_id: &Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM user_skills WHERE user_id = $1 AND skill_id = $2")
            .bind(user_id)
            .bind(skill_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
