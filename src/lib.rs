use std::sync::Arc;

use redis::{AsyncCommands, Client as RedisClient};

mod domain;
mod infrastructure;
mod interfaces;
pub mod background_task;
pub mod constants;
pub mod errors;
pub mod graceful_shutdown;
pub mod settings;

pub use domain::{codec, compatibility, entities, skill_scoring, store, use_cases};
pub use infrastructure::{auth, db, github, notifications, realtime, utils};
pub use interfaces::{handlers, middlewares, repositories, routes};

use auth::jwt::JwtService;
use errors::AppError;
use github::{
    client::GitHubClient,
    oauth::{GitHubOAuth, OAuthStateStore},
};
use notifications::email::{EmailNotifier, Notifier};
use realtime::hub::RealtimeHub;
use repositories::sqlx_repo::{SqlxMatchRepo, SqlxMessagingRepo, SqlxProfileRepo, SqlxProjectRepo, SqlxSkillRepo};
use use_cases::{
    admin::AdminHandler, matching::MatchHandler, messaging::MessagingHandler, profiles::ProfileHandler,
    projects::ProjectHandler, skill_validation::SkillValidationHandler,
};

pub type AppProfileHandler = ProfileHandler<SqlxProfileRepo, SqlxSkillRepo, SqlxProjectRepo>;
pub type AppProjectHandler = ProjectHandler<SqlxProjectRepo>;
pub type AppSkillValidationHandler = SkillValidationHandler<GitHubClient, SqlxProfileRepo, SqlxSkillRepo>;
pub type AppMatchHandler = MatchHandler<SqlxMatchRepo, SqlxProfileRepo, SqlxSkillRepo>;
pub type AppMessagingHandler = MessagingHandler<SqlxMessagingRepo, SqlxProfileRepo>;
pub type AppAdminHandler = AdminHandler<SqlxProfileRepo, SqlxMatchRepo>;

const RATE_LIMIT_WINDOW_SECS: i64 = 60;

pub struct AppState {
    pub profile_handler: AppProfileHandler,
    pub project_handler: AppProjectHandler,
    pub skill_validation_handler: AppSkillValidationHandler,
    pub match_handler: AppMatchHandler,
    pub messaging_handler: AppMessagingHandler,
    pub admin_handler: AppAdminHandler,
    pub token_service: JwtService,
    pub oauth: GitHubOAuth,
    pub oauth_states: Arc<OAuthStateStore>,
    pub hub: Arc<RealtimeHub>,
    pub redis_client: Option<RedisClient>,
    pub message_rate_limit: u32,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        let profile_repo = SqlxProfileRepo::new(pool.clone());
        let skill_repo = SqlxSkillRepo::new(pool.clone());
        let project_repo = SqlxProjectRepo::new(pool.clone());
        let match_repo = SqlxMatchRepo::new(pool.clone());
        let messaging_repo = SqlxMessagingRepo::new(pool);

        let email = EmailNotifier::new(config);
        if !email.is_enabled() {
            tracing::info!("No email endpoint configured, notifications are disabled");
        }
        let notifier: Arc<dyn Notifier> = Arc::new(email);
        let hub = Arc::new(RealtimeHub::default());

        let redis_client = config.redis_url.as_ref().and_then(|url| {
            RedisClient::open(url.as_str())
                .map_err(|e| tracing::error!("Redis connection error: {}", e))
                .ok()
        });

        AppState {
            profile_handler: ProfileHandler::new(
                profile_repo.clone(),
                skill_repo.clone(),
                project_repo.clone(),
                notifier.clone(),
            ),
            project_handler: ProjectHandler::new(project_repo),
            skill_validation_handler: SkillValidationHandler::new(
                GitHubClient::new(config),
                profile_repo.clone(),
                skill_repo.clone(),
            ),
            match_handler: MatchHandler::new(match_repo.clone(), profile_repo.clone(), skill_repo, notifier.clone()),
            messaging_handler: MessagingHandler::new(messaging_repo, profile_repo.clone(), hub.clone(), notifier),
            admin_handler: AdminHandler::new(profile_repo, match_repo),
            token_service: JwtService::new(config),
            oauth: GitHubOAuth::new(config),
            oauth_states: Arc::new(OAuthStateStore::default()),
            hub,
            redis_client,
            message_rate_limit: config.message_rate_limit,
        }
    }

    /// Counts one action against `key` in a fixed one-minute window. Allows
    /// the action when Redis is absent or unreachable.
    pub async fn check_rate_limit(&self, key: &str, limit: u32) -> Result<(), AppError> {
        let Some(redis) = &self.redis_client else {
            return Ok(());
        };
        if limit == 0 {
            return Ok(());
        }

        let count = match redis_incr_with_ttl(redis, key, RATE_LIMIT_WINDOW_SECS).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, key, "Rate limit check skipped, Redis unavailable");
                return Ok(());
            }
        };

        if count > i64::from(limit) {
            tracing::warn!(key, count, limit, "Rate limit exceeded");
            return Err(AppError::RateLimited(format!(
                "At most {limit} messages per minute, try again shortly"
            )));
        }
        Ok(())
    }

    pub async fn redis_status(&self) -> &'static str {
        let Some(redis) = &self.redis_client else {
            return "Not configured";
        };
        match redis.get_multiplexed_async_connection().await {
            Ok(mut conn) => match conn.ping::<String>().await {
                Ok(pong) if pong == "PONG" => "OK",
                _ => "Unavailable",
            },
            Err(_) => "Unavailable",
        }
    }
}

/// Increments `key` and sets its expiry when the window starts.
pub async fn redis_incr_with_ttl(client: &RedisClient, key: &str, ttl_secs: i64) -> redis::RedisResult<i64> {
    let mut conn = client.get_multiplexed_async_connection().await?;
    let count: i64 = conn.incr(key, 1).await?;
    if count == 1 {
        let _: () = conn.expire(key, ttl_secs).await?;
    }
    Ok(count)
}
