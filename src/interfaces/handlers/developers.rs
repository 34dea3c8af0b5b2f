use actix_web::{http::header, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::profile::DeveloperSearchQuery, errors::AppError, utils::valid_uuid::parse_entity_id, AppState,
};

#[instrument(skip(state, query))]
pub async fn search_developers(
    state: web::Data<AppState>,
    query: web::Query<DeveloperSearchQuery>,
) -> Result<impl Responder, AppError> {
    let developers = state.profile_handler.search_developers(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(developers))
}

#[instrument(skip(state))]
pub async fn get_developer(
    developer_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let developer_id = parse_entity_id("developer", &developer_id)?;
    let developer = state.profile_handler.get_developer(&developer_id).await?;
    Ok(HttpResponse::Ok().json(developer))
}

#[instrument(skip(state))]
pub async fn social_card(
    developer_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let developer_id = parse_entity_id("developer", &developer_id)?;
    let svg = state.profile_handler.social_card(&developer_id).await?;

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "image/svg+xml; charset=utf-8"))
        .insert_header((header::CACHE_CONTROL, "public, max-age=3600"))
        .body(svg))
}
