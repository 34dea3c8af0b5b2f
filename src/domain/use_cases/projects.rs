use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::project::{NewProjectRequest, Project, ProjectCreatedResponse},
    errors::AppError,
    repositories::project::ProjectRepository,
};

pub struct ProjectHandler<J>
where
    J: ProjectRepository,
{
    pub project_repo: J,
}

impl<J> ProjectHandler<J>
where
    J: ProjectRepository,
{
    pub fn new(project_repo: J) -> Self {
        ProjectHandler { project_repo }
    }

    pub async fn list_projects(&self, owner_id: &Uuid) -> Result<Vec<Project>, AppError> {
        self.project_repo.list_projects(owner_id).await
    }

    pub async fn create_project(
        &self,
        owner_id: &Uuid,
        request: NewProjectRequest,
    ) -> Result<ProjectCreatedResponse, AppError> {
        request.validate()?;

        let id = self.project_repo.create_project(owner_id, &request).await?;
        tracing::info!(%owner_id, project_id = %id, "Project created");

        Ok(ProjectCreatedResponse {
            id,
            message: "Project created successfully".to_string(),
        })
    }

    /// Only the owner may delete a project.
    pub async fn delete_project(&self, project_id: &Uuid, user_id: &Uuid) -> Result<(), AppError> {
        let project = self
            .project_repo
            .get_project(project_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

        if project.owner_id != *user_id {
            return Err(AppError::ForbiddenAccess);
        }

        self.project_repo.delete_project(project_id).await
    }
}
