use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::profile::{UpsertCompanyProfileRequest, UpsertDeveloperProfileRequest, UpsertProfileRequest},
    errors::AppError,
    use_cases::extractors::AuthClaims,
    AppState,
};

#[instrument(skip(claims, state))]
pub async fn get_me(claims: AuthClaims, state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let user_id = claims.user_id()?;
    let me = state.profile_handler.get_me(&user_id).await?;
    Ok(HttpResponse::Ok().json(me))
}

#[instrument(skip(claims, state, data))]
pub async fn upsert_profile(
    claims: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<UpsertProfileRequest>,
) -> Result<impl Responder, AppError> {
    let user_id = claims.user_id()?;
    let profile = state.profile_handler.upsert_profile(&user_id, data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[instrument(skip(claims, state, data))]
pub async fn upsert_developer_profile(
    claims: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<UpsertDeveloperProfileRequest>,
) -> Result<impl Responder, AppError> {
    let user_id = claims.user_id()?;
    let profile = state
        .profile_handler
        .upsert_developer_profile(&user_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[instrument(skip(claims, state, data))]
pub async fn upsert_company_profile(
    claims: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<UpsertCompanyProfileRequest>,
) -> Result<impl Responder, AppError> {
    let user_id = claims.user_id()?;
    let profile = state
        .profile_handler
        .upsert_company_profile(&user_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}
