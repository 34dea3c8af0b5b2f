use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::skill::AddUserSkillRequest, errors::AppError, use_cases::extractors::AuthClaims,
    utils::valid_uuid::parse_entity_id, AppState,
};

#[instrument(skip(claims, state))]
pub async fn list_my_skills(claims: AuthClaims, state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let user_id = claims.user_id()?;
    let skills = state.profile_handler.list_user_skills(&user_id).await?;
    Ok(HttpResponse::Ok().json(skills))
}

#[instrument(skip(claims, state, data))]
pub async fn add_skill(
    claims: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<AddUserSkillRequest>,
) -> Result<impl Responder, AppError> {
    let user_id = claims.user_id()?;
    let skills = state.profile_handler.add_user_skill(&user_id, data.into_inner()).await?;
    Ok(HttpResponse::Created().json(skills))
}

#[instrument(skip(claims, state))]
pub async fn remove_skill(
    claims: AuthClaims,
    skill_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let user_id = claims.user_id()?;
    let skill_id = parse_entity_id("skill", &skill_id)?;
    state.profile_handler.remove_user_skill(&user_id, &skill_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
