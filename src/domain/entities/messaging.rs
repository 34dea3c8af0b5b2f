use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::codec::{required, DecodeError};

pub const MAX_MESSAGE_LENGTH: u64 = 5000;

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Conversation {
    pub id: Uuid,
    pub match_id: Option<Uuid>,
    pub developer_id: Uuid,
    pub company_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_message_at: Option<DateTime<Utc>>,
}

impl Conversation {
    pub fn is_participant(&self, user_id: &Uuid) -> bool {
        self.developer_id == *user_id || self.company_id == *user_id
    }

    pub fn other_participant(&self, user_id: &Uuid) -> Uuid {
        if self.developer_id == *user_id {
            self.company_id
        } else {
            self.developer_id
        }
    }
}

/// A conversation as seen by one participant.
#[derive(Debug, sqlx::FromRow)]
pub struct ConversationSummaryRow {
    pub id: Uuid,
    pub match_id: Option<Uuid>,
    pub other_party_id: Uuid,
    pub other_party_name: Option<String>,
    pub other_party_avatar_url: Option<String>,
    pub last_message: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub unread_count: i64,
    pub created_at: DateTime<Utc>,
}

/// `messages` joined with the sender's profile.
#[derive(Debug, sqlx::FromRow)]
pub struct MessageRow {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Option<Uuid>,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
    pub sender_name: Option<String>,
    pub sender_avatar_url: Option<String>,
}

#[derive(Debug)]
pub struct MessageInsert {
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
}

// ───── Domain Models ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationSummary {
    pub id: Uuid,
    pub match_id: Option<Uuid>,
    pub other_party: Participant,
    pub last_message: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub unread_count: i64,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ConversationSummaryRow> for ConversationSummary {
    type Error = DecodeError;

    fn try_from(row: ConversationSummaryRow) -> Result<Self, Self::Error> {
        Ok(ConversationSummary {
            id: row.id,
            match_id: row.match_id,
            other_party: Participant {
                id: row.other_party_id,
                full_name: required("conversation", "other_party_name", row.other_party_name)?,
                avatar_url: row.other_party_avatar_url,
            },
            last_message: row.last_message,
            last_message_at: row.last_message_at,
            unread_count: row.unread_count,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Participant {
    pub id: Uuid,
    pub full_name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender: Participant,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl TryFrom<MessageRow> for Message {
    type Error = DecodeError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        Ok(Message {
            id: row.id,
            conversation_id: row.conversation_id,
            sender: Participant {
                id: required("message", "sender_id", row.sender_id)?,
                full_name: required("message", "sender_name", row.sender_name)?,
                avatar_url: row.sender_avatar_url,
            },
            body: row.body,
            created_at: row.created_at,
            read_at: row.read_at,
        })
    }
}

// ───── Input & Validation ───────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NewMessageRequest {
    #[validate(length(min = 1, max = MAX_MESSAGE_LENGTH, message = "Message must be 1-5000 characters"))]
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub conversation_id: Uuid,
    pub marked: u64,
}
