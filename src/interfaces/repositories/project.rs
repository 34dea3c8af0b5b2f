use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::project::{NewProjectRequest, Project},
    errors::AppError,
    repositories::sqlx_repo::SqlxProjectRepo,
};

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn list_projects(&self, owner_id: &Uuid) -> Result<Vec<Project>, AppError>;
    async fn create_project(&self, owner_id: &Uuid, project: &NewProjectRequest) -> Result<Uuid, AppError>;
    async fn get_project(&self, id: &Uuid) -> Result<Option<Project>, AppError>;
    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn list_projects(&self, owner_id: &Uuid) -> Result<Vec<Project>, AppError> {
        sqlx::query_as::<_, Project>(
            r#"SELECT id, owner_id, title, description, url, repository_url, technologies, created_at, updated_at
               FROM projects WHERE owner_id = $1
               ORDER BY created_at DESC"#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn create_project(&self, owner_id: &Uuid, project: &NewProjectRequest) -> Result<Uuid, AppError> {
        let technologies: Vec<String> = project.technologies.iter().map(|t| t.trim().to_string()).collect();

        let id: Uuid = sqlx::query_scalar(
            r#"INSERT INTO projects (owner_id, title, description, url, repository_url, technologies)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id"#,
        )
        .bind(owner_id)
        .bind(project.title.trim())
        .bind(project.description.trim())
        .bind(&project.url)
        .bind(&project.repository_url)
        .bind(&technologies)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get_project(&self, id: &Uuid) -> Result<Option<Project>, AppError> {
        sqlx::query_as::<_, Project>(
            r#"SELECT id, owner_id, title, description, url, repository_url, technologies, created_at, updated_at
               FROM projects WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Project not found".to_string()));
        }
        Ok(())
    }
}
