use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::matching::{NewMatchRequest, RespondToMatchRequest},
    errors::AppError,
    use_cases::extractors::AuthClaims,
    utils::valid_uuid::parse_entity_id,
    AppState,
};

#[instrument(skip(claims, state))]
pub async fn list_matches(claims: AuthClaims, state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let user_id = claims.user_id()?;
    let matches = state.match_handler.list_matches(&user_id).await?;
    Ok(HttpResponse::Ok().json(matches))
}

#[instrument(skip(claims, state, data))]
pub async fn create_match(
    claims: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<NewMatchRequest>,
) -> Result<impl Responder, AppError> {
    let company_id = claims.user_id()?;
    let created = state.match_handler.create_match(&company_id, data.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

#[instrument(skip(claims, state))]
pub async fn get_match(
    claims: AuthClaims,
    match_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let user_id = claims.user_id()?;
    let match_id = parse_entity_id("match", &match_id)?;
    let matched = state.match_handler.get_match(&match_id, &user_id).await?;
    Ok(HttpResponse::Ok().json(matched))
}

#[instrument(skip(claims, state, data))]
pub async fn respond_to_match(
    claims: AuthClaims,
    match_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<RespondToMatchRequest>,
) -> Result<impl Responder, AppError> {
    let user_id = claims.user_id()?;
    let match_id = parse_entity_id("match", &match_id)?;
    let response = state
        .match_handler
        .respond(&match_id, &user_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}
