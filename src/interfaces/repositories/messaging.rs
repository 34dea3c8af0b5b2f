use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::messaging::{Conversation, ConversationSummaryRow, MessageInsert, MessageRow},
    errors::AppError,
    repositories::sqlx_repo::SqlxMessagingRepo,
};

const MESSAGE_SELECT: &str = r#"
    SELECT m.id, m.conversation_id, m.sender_id, m.body, m.created_at, m.read_at,
           p.full_name AS sender_name, p.avatar_url AS sender_avatar_url
    FROM messages m
    LEFT JOIN profiles p ON p.id = m.sender_id
"#;

#[async_trait]
pub trait MessagingRepository: Send + Sync {
    async fn get_conversation(&self, id: &Uuid) -> Result<Option<Conversation>, AppError>;
    async fn list_conversations(&self, user_id: &Uuid) -> Result<Vec<ConversationSummaryRow>, AppError>;
    async fn list_messages(&self, conversation_id: &Uuid) -> Result<Vec<MessageRow>, AppError>;
    async fn insert_message(&self, message: &MessageInsert) -> Result<Uuid, AppError>;
    /// Re-reads a stored message together with its sender's profile.
    async fn get_message(&self, id: &Uuid) -> Result<Option<MessageRow>, AppError>;
    /// Marks every message not sent by `reader_id` as read. Returns the number marked.
    async fn mark_read(&self, conversation_id: &Uuid, reader_id: &Uuid) -> Result<u64, AppError>;
}

impl SqlxMessagingRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxMessagingRepo { pool }
    }
}

#[async_trait]
impl MessagingRepository for SqlxMessagingRepo {
    async fn get_conversation(&self, id: &Uuid) -> Result<Option<Conversation>, AppError> {
        sqlx::query_as::<_, Conversation>(
            "SELECT id, match_id, developer_id, company_id, created_at, last_message_at
             FROM conversations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn list_conversations(&self, user_id: &Uuid) -> Result<Vec<ConversationSummaryRow>, AppError> {
        sqlx::query_as::<_, ConversationSummaryRow>(
            r#"SELECT c.id, c.match_id,
                      other.id AS other_party_id,
                      other.full_name AS other_party_name,
                      other.avatar_url AS other_party_avatar_url,
                      last.body AS last_message,
                      c.last_message_at,
                      (SELECT COUNT(*) FROM messages u
                        WHERE u.conversation_id = c.id
                          AND u.read_at IS NULL
                          AND u.sender_id IS DISTINCT FROM $1) AS unread_count,
                      c.created_at
               FROM conversations c
               JOIN LATERAL (
                   SELECT CASE WHEN c.developer_id = $1 THEN c.company_id ELSE c.developer_id END AS id
               ) o ON TRUE
               LEFT JOIN profiles other ON other.id = o.id
               LEFT JOIN LATERAL (
                   SELECT body FROM messages lm
                   WHERE lm.conversation_id = c.id
                   ORDER BY lm.created_at DESC, lm.id DESC
                   LIMIT 1
               ) last ON TRUE
               WHERE c.developer_id = $1 OR c.company_id = $1
               ORDER BY COALESCE(c.last_message_at, c.created_at) DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn list_messages(&self, conversation_id: &Uuid) -> Result<Vec<MessageRow>, AppError> {
        let sql = format!("{MESSAGE_SELECT} WHERE m.conversation_id = $1 ORDER BY m.created_at, m.id");
        sqlx::query_as::<_, MessageRow>(&sql)
            .bind(conversation_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn insert_message(&self, message: &MessageInsert) -> Result<Uuid, AppError> {
        let mut tx = self.pool.begin().await?;

        let (id, created_at): (Uuid, chrono::DateTime<chrono::Utc>) = sqlx::query_as(
            r#"INSERT INTO messages (conversation_id, sender_id, body)
               VALUES ($1, $2, $3)
               RETURNING id, created_at"#,
        )
        .bind(message.conversation_id)
        .bind(message.sender_id)
        .bind(&message.body)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE conversations SET last_message_at = $2 WHERE id = $1")
            .bind(message.conversation_id)
            .bind(created_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(id)
    }

    async fn get_message(&self, id: &Uuid) -> Result<Option<MessageRow>, AppError> {
        let sql = format!("{MESSAGE_SELECT} WHERE m.id = $1");
        sqlx::query_as::<_, MessageRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn mark_read(&self, conversation_id: &Uuid, reader_id: &Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"UPDATE messages SET read_at = NOW()
               WHERE conversation_id = $1
                 AND read_at IS NULL
                 AND sender_id IS DISTINCT FROM $2"#,
        )
        .bind(conversation_id)
        .bind(reader_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
