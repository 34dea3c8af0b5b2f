use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::codec::decode_all,
    entities::messaging::{
        Conversation, ConversationSummary, MarkReadResponse, Message, MessageInsert, NewMessageRequest,
    },
    errors::{AppError, FieldError},
    notifications::email::{dispatch, Notification, Notifier},
    realtime::hub::{RealtimeEvent, RealtimeHub},
    repositories::{messaging::MessagingRepository, profile::ProfileRepository},
    utils::markdown::sanitize_plain_text,
};

const PREVIEW_CHARS: usize = 140;

pub struct MessagingHandler<C, P>
where
    C: MessagingRepository,
    P: ProfileRepository,
{
    pub messaging_repo: C,
    pub profile_repo: P,
    pub hub: Arc<RealtimeHub>,
    pub notifier: Arc<dyn Notifier>,
}

impl<C, P> MessagingHandler<C, P>
where
    C: MessagingRepository,
    P: ProfileRepository,
{
    pub fn new(messaging_repo: C, profile_repo: P, hub: Arc<RealtimeHub>, notifier: Arc<dyn Notifier>) -> Self {
        MessagingHandler {
            messaging_repo,
            profile_repo,
            hub,
            notifier,
        }
    }

    pub async fn list_conversations(&self, user_id: &Uuid) -> Result<Vec<ConversationSummary>, AppError> {
        let rows = self.messaging_repo.list_conversations(user_id).await?;
        Ok(decode_all(rows)?)
    }

    /// Messages of a conversation, oldest first. Participants only.
    pub async fn get_messages(&self, conversation_id: &Uuid, user_id: &Uuid) -> Result<Vec<Message>, AppError> {
        self.participant_conversation(conversation_id, user_id).await?;
        let rows = self.messaging_repo.list_messages(conversation_id).await?;
        Ok(decode_all(rows)?)
    }

    pub async fn send_message(
        &self,
        conversation_id: &Uuid,
        sender_id: &Uuid,
        request: NewMessageRequest,
    ) -> Result<Message, AppError> {
        request.validate()?;
        let conversation = self.participant_conversation(conversation_id, sender_id).await?;

        let body = sanitize_plain_text(&request.body);
        if body.is_empty() {
            return Err(AppError::ValidationError(vec![FieldError {
                field: "body".to_string(),
                message: "Message cannot be empty".to_string(),
            }]));
        }

        let id = self
            .messaging_repo
            .insert_message(&MessageInsert {
                conversation_id: *conversation_id,
                sender_id: *sender_id,
                body,
            })
            .await?;

        // Re-read so subscribers get the same shape as the history endpoint.
        let row = self
            .messaging_repo
            .get_message(&id)
            .await?
            .ok_or_else(|| AppError::InternalError(format!("Message {id} vanished after insert")))?;
        let message = Message::try_from(row)?;

        let delivered = self.hub.publish(
            *conversation_id,
            RealtimeEvent::NewMessage {
                message: message.clone(),
            },
        );
        tracing::debug!(%conversation_id, message_id = %id, delivered, "Message published");

        self.notify_recipient(&conversation, &message).await;

        Ok(message)
    }

    /// Opens a realtime subscription after checking membership.
    pub async fn subscribe(
        &self,
        conversation_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<broadcast::Receiver<RealtimeEvent>, AppError> {
        self.participant_conversation(conversation_id, user_id).await?;
        Ok(self.hub.subscribe(*conversation_id))
    }

    pub async fn mark_read(&self, conversation_id: &Uuid, user_id: &Uuid) -> Result<MarkReadResponse, AppError> {
        self.participant_conversation(conversation_id, user_id).await?;

        let marked = self.messaging_repo.mark_read(conversation_id, user_id).await?;
        if marked > 0 {
            self.hub.publish(
                *conversation_id,
                RealtimeEvent::MessagesRead {
                    conversation_id: *conversation_id,
                    reader_id: *user_id,
                    read_at: Utc::now(),
                },
            );
        }

        Ok(MarkReadResponse {
            conversation_id: *conversation_id,
            marked,
        })
    }

    async fn participant_conversation(&self, conversation_id: &Uuid, user_id: &Uuid) -> Result<Conversation, AppError> {
        let conversation = self
            .messaging_repo
            .get_conversation(conversation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Conversation not found".to_string()))?;

        if !conversation.is_participant(user_id) {
            tracing::warn!(%conversation_id, %user_id, "Non-participant tried to access conversation");
            return Err(AppError::ForbiddenAccess);
        }
        Ok(conversation)
    }

    async fn notify_recipient(&self, conversation: &Conversation, message: &Message) {
        let recipient_id = conversation.other_participant(&message.sender.id);
        match self.profile_repo.get_profile(&recipient_id).await {
            Ok(Some(recipient)) => dispatch(
                self.notifier.clone(),
                Notification::NewMessage {
                    to: recipient.email,
                    sender_name: message.sender.full_name.clone(),
                    conversation_id: conversation.id,
                    preview: preview(&message.body),
                },
            ),
            Ok(None) => tracing::warn!(%recipient_id, "Message recipient has no profile"),
            Err(e) => tracing::warn!(%recipient_id, error = %e, "Could not load message recipient"),
        }
    }
}

pub fn preview(body: &str) -> String {
    if body.chars().count() <= PREVIEW_CHARS {
        return body.to_string();
    }
    let mut cut: String = body.chars().take(PREVIEW_CHARS).collect();
    cut.push('…');
    cut
}
