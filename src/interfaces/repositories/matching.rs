use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    domain::codec::decode_all,
    entities::matching::{MatchInsert, MatchResponse, MatchResponseRow, MatchRow, MatchStatus, ResponseStatus},
    errors::AppError,
    repositories::sqlx_repo::SqlxMatchRepo,
};

const MATCH_SELECT: &str = r#"
    SELECT m.id, m.developer_id, m.company_id, m.position_title, m.required_skills,
           m.compatibility_score, m.status, dp.full_name AS developer_name,
           cp.company_name, m.created_at, m.updated_at
    FROM matches m
    LEFT JOIN profiles dp ON dp.id = m.developer_id
    LEFT JOIN company_profiles cp ON cp.user_id = m.company_id
"#;

/// Number of matches per status.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Outcome of recording a response, written in one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedResponse {
    pub status: MatchStatus,
    /// Set when the match turned mutual and a conversation exists for it.
    pub conversation_id: Option<Uuid>,
}

#[async_trait]
pub trait MatchRepository: Send + Sync {
    async fn create_match(&self, new_match: &MatchInsert) -> Result<Uuid, AppError>;
    async fn get_match(&self, id: &Uuid) -> Result<Option<MatchRow>, AppError>;
    async fn list_matches_for(&self, user_id: &Uuid) -> Result<Vec<MatchRow>, AppError>;
    /// Stores `user_id`'s response, recomputes the match status from both
    /// sides' responses and opens the conversation once the match is mutual.
    async fn record_response(
        &self,
        match_id: &Uuid,
        user_id: &Uuid,
        response: ResponseStatus,
    ) -> Result<RecordedResponse, AppError>;
    async fn count_by_status(&self) -> Result<Vec<StatusCount>, AppError>;
}

impl SqlxMatchRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxMatchRepo { pool }
    }
}

#[async_trait]
impl MatchRepository for SqlxMatchRepo {
    async fn create_match(&self, new_match: &MatchInsert) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"INSERT INTO matches (developer_id, company_id, position_title, required_skills, compatibility_score)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id"#,
        )
        .bind(new_match.developer_id)
        .bind(new_match.company_id)
        .bind(&new_match.position_title)
        .bind(&new_match.required_skills)
        .bind(new_match.compatibility_score)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get_match(&self, id: &Uuid) -> Result<Option<MatchRow>, AppError> {
        let sql = format!("{MATCH_SELECT} WHERE m.id = $1");
        sqlx::query_as::<_, MatchRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn list_matches_for(&self, user_id: &Uuid) -> Result<Vec<MatchRow>, AppError> {
        let sql = format!("{MATCH_SELECT} WHERE m.developer_id = $1 OR m.company_id = $1 ORDER BY m.updated_at DESC");
        sqlx::query_as::<_, MatchRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn record_response(
        &self,
        match_id: &Uuid,
        user_id: &Uuid,
        response: ResponseStatus,
    ) -> Result<RecordedResponse, AppError> {
        let mut tx = self.pool.begin().await?;

        // Lock the match so concurrent responses see each other.
        let (developer_id, company_id): (Uuid, Uuid) =
            sqlx::query_as("SELECT developer_id, company_id FROM matches WHERE id = $1 FOR UPDATE")
                .bind(match_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound("Match not found".to_string()))?;

        sqlx::query(
            r#"INSERT INTO match_responses (match_id, user_id, status)
               VALUES ($1, $2, $3)
               ON CONFLICT (match_id, user_id) DO UPDATE SET
                   status = EXCLUDED.status,
                   responded_at = NOW()"#,
        )
        .bind(match_id)
        .bind(user_id)
        .bind(response.as_str())
        .execute(&mut *tx)
        .await?;

        let rows = sqlx::query_as::<_, MatchResponseRow>("SELECT user_id, status FROM match_responses WHERE match_id = $1")
            .bind(match_id)
            .fetch_all(&mut *tx)
            .await?;
        let responses: Vec<MatchResponse> = decode_all(rows)?;

        let side = |party: Uuid| responses.iter().find(|r| r.user_id == party).map(|r| r.status);
        let status = MatchStatus::from_responses(side(developer_id), side(company_id));

        sqlx::query("UPDATE matches SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(match_id)
            .bind(status.as_str())
            .execute(&mut *tx)
            .await?;

        let conversation_id = if status == MatchStatus::Mutual {
            let id: Uuid = sqlx::query_scalar(
                r#"INSERT INTO conversations (match_id, developer_id, company_id)
                   VALUES ($1, $2, $3)
                   ON CONFLICT (match_id) DO UPDATE SET match_id = conversations.match_id
                   RETURNING id"#,
            )
            .bind(match_id)
            .bind(developer_id)
            .bind(company_id)
            .fetch_one(&mut *tx)
            .await?;
            Some(id)
        } else {
            None
        };

        tx.commit().await?;

        Ok(RecordedResponse { status, conversation_id })
    }

    async fn count_by_status(&self) -> Result<Vec<StatusCount>, AppError> {
        sqlx::query_as::<_, StatusCount>("SELECT status, COUNT(*) AS count FROM matches GROUP BY status ORDER BY status")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }
}
