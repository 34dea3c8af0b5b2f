use actix_web::{http::header, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::messaging::NewMessageRequest,
    errors::AppError,
    realtime::hub::{sse_stream, KEEP_ALIVE_INTERVAL},
    use_cases::extractors::AuthClaims,
    utils::valid_uuid::parse_entity_id,
    AppState,
};

#[instrument(skip(claims, state))]
pub async fn list_conversations(claims: AuthClaims, state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let user_id = claims.user_id()?;
    let conversations = state.messaging_handler.list_conversations(&user_id).await?;
    Ok(HttpResponse::Ok().json(conversations))
}

#[instrument(skip(claims, state))]
pub async fn get_messages(
    claims: AuthClaims,
    conversation_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let user_id = claims.user_id()?;
    let conversation_id = parse_entity_id("conversation", &conversation_id)?;
    let messages = state.messaging_handler.get_messages(&conversation_id, &user_id).await?;
    Ok(HttpResponse::Ok().json(messages))
}

#[instrument(skip(claims, state, data))]
pub async fn send_message(
    claims: AuthClaims,
    conversation_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<NewMessageRequest>,
) -> Result<impl Responder, AppError> {
    let user_id = claims.user_id()?;
    let conversation_id = parse_entity_id("conversation", &conversation_id)?;

    state
        .check_rate_limit(&format!("rate:messages:{user_id}"), state.message_rate_limit)
        .await?;

    let message = state
        .messaging_handler
        .send_message(&conversation_id, &user_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(message))
}

/// Server-Sent Events stream of a conversation's new messages and read
/// receipts. Closing the connection ends the subscription.
#[instrument(skip(claims, state))]
pub async fn conversation_events(
    claims: AuthClaims,
    conversation_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let user_id = claims.user_id()?;
    let conversation_id = parse_entity_id("conversation", &conversation_id)?;
    let receiver = state.messaging_handler.subscribe(&conversation_id, &user_id).await?;

    tracing::info!(%conversation_id, %user_id, "Realtime subscription opened");
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "text/event-stream"))
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .insert_header(("X-Accel-Buffering", "no"))
        .streaming(sse_stream(receiver, conversation_id, KEEP_ALIVE_INTERVAL)))
}

#[instrument(skip(claims, state))]
pub async fn mark_read(
    claims: AuthClaims,
    conversation_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let user_id = claims.user_id()?;
    let conversation_id = parse_entity_id("conversation", &conversation_id)?;
    let response = state.messaging_handler.mark_read(&conversation_id, &user_id).await?;
    Ok(HttpResponse::Ok().json(response))
}
