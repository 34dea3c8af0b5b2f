use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::project::NewProjectRequest, errors::AppError, use_cases::extractors::AuthClaims,
    utils::valid_uuid::parse_entity_id, AppState,
};

#[instrument(skip(claims, state))]
pub async fn list_my_projects(claims: AuthClaims, state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let user_id = claims.user_id()?;
    let projects = state.project_handler.list_projects(&user_id).await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[instrument(skip(claims, state, data))]
pub async fn create_project(
    claims: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<NewProjectRequest>,
) -> Result<impl Responder, AppError> {
    let user_id = claims.user_id()?;
    let response = state.project_handler.create_project(&user_id, data.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(claims, state))]
pub async fn delete_project(
    claims: AuthClaims,
    project_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let user_id = claims.user_id()?;
    let project_id = parse_entity_id("project", &project_id)?;
    state.project_handler.delete_project(&project_id, &user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
