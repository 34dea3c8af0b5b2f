use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    errors::AppError,
    use_cases::{extractors::AuthClaims, inbox::assemble_inbox},
    utils::valid_uuid::parse_entity_id,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct InboxQuery {
    pub conversation: Option<String>,
}

/// Normalized snapshot of the caller's conversations, matches and, when
/// `?conversation=` is given, that conversation's messages.
#[instrument(skip(claims, state, query))]
pub async fn get_inbox(
    claims: AuthClaims,
    state: web::Data<AppState>,
    query: web::Query<InboxQuery>,
) -> Result<impl Responder, AppError> {
    let user_id = claims.user_id()?;
    let active_id = query
        .conversation
        .as_deref()
        .map(|id| parse_entity_id("conversation", id))
        .transpose()?;

    let (conversations, matches) = tokio::try_join!(
        state.messaging_handler.list_conversations(&user_id),
        state.match_handler.list_matches(&user_id),
    )?;

    let active = match active_id {
        Some(id) => Some((id, state.messaging_handler.get_messages(&id, &user_id).await?)),
        None => None,
    };

    let inbox = assemble_inbox(conversations, matches, active);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "inbox": inbox,
        "total_unread": inbox.total_unread(),
    })))
}
