use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::github::{GitHubConnectResponse, OAuthCallbackQuery, ValidateSkillsRequest},
    errors::AppError,
    use_cases::extractors::AuthClaims,
    AppState,
};

/// Starts the OAuth flow: returns the URL the client should open.
#[instrument(skip(claims, state))]
pub async fn connect_github(claims: AuthClaims, state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let user_id = claims.user_id()?;

    let issued = state.oauth_states.issue(user_id);
    let authorize_url = match state.oauth.authorize_url(&issued) {
        Ok(url) => url,
        Err(e) => {
            // Drop the state so it cannot be redeemed later.
            let _ = state.oauth_states.consume(&issued);
            return Err(e.into());
        }
    };

    Ok(HttpResponse::Ok().json(GitHubConnectResponse {
        authorize_url,
        state: issued,
    }))
}

/// GitHub redirects the browser here. The state identifies the user, so no
/// bearer token is required.
#[instrument(skip(state, query))]
pub async fn github_callback(
    state: web::Data<AppState>,
    query: web::Query<OAuthCallbackQuery>,
) -> Result<impl Responder, AppError> {
    let query = query.into_inner();
    let user_id = state.oauth_states.consume(&query.state)?;

    let token = state.oauth.exchange_code(&query.code).await?;
    let connected = state.skill_validation_handler.connect(&user_id, &token).await?;

    tracing::info!(%user_id, github = %connected.github_username, saved = connected.saved, "GitHub connected");
    Ok(HttpResponse::Ok().json(connected))
}

#[instrument(skip(claims, state, data))]
pub async fn validate_skills(
    claims: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<ValidateSkillsRequest>,
) -> Result<impl Responder, AppError> {
    let user_id = claims.user_id()?;
    let response = state
        .skill_validation_handler
        .validate(&user_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}
