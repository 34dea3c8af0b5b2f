//! Normalized inbox state.
//!
//! Conversations, messages and matches are kept in entity maps keyed by id,
//! and every change goes through [`reduce`]. Reducing consumes the previous
//! state and returns the next one, so a snapshot handed to a caller never
//! changes underneath it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::{
    matching::Match,
    messaging::{ConversationSummary, Message},
};

/// Entities by id plus their display order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EntityMap<T> {
    pub by_id: HashMap<Uuid, T>,
    pub all_ids: Vec<Uuid>,
}

impl<T> Default for EntityMap<T> {
    fn default() -> Self {
        EntityMap {
            by_id: HashMap::new(),
            all_ids: Vec::new(),
        }
    }
}

impl<T> EntityMap<T> {
    pub fn get(&self, id: &Uuid) -> Option<&T> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.all_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_ids.is_empty()
    }

    /// Entities in display order.
    pub fn ordered(&self) -> impl Iterator<Item = &T> {
        self.all_ids.iter().filter_map(|id| self.by_id.get(id))
    }

    fn upsert(&mut self, id: Uuid, entity: T) {
        if self.by_id.insert(id, entity).is_none() {
            self.all_ids.push(id);
        }
    }

    fn sort_ids_by<K: Ord>(&mut self, key: impl Fn(&T) -> K) {
        let by_id = &self.by_id;
        self.all_ids.sort_by_key(|id| by_id.get(id).map(&key));
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct InboxState {
    pub conversations: EntityMap<ConversationSummary>,
    pub messages: EntityMap<Message>,
    /// Message ids per conversation, oldest first.
    pub messages_by_conversation: HashMap<Uuid, Vec<Uuid>>,
    pub matches: EntityMap<Match>,
    pub active_conversation: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub enum InboxAction {
    ConversationsLoaded(Vec<ConversationSummary>),
    MessagesLoaded {
        conversation_id: Uuid,
        messages: Vec<Message>,
    },
    MessageReceived {
        message: Message,
        viewer_id: Uuid,
    },
    ActiveConversationChanged(Option<Uuid>),
    MessagesRead {
        conversation_id: Uuid,
        reader_id: Uuid,
        read_at: DateTime<Utc>,
    },
    MatchesLoaded(Vec<Match>),
}

/// Applies `action` to `state` and returns the resulting state.
pub fn reduce(mut state: InboxState, action: InboxAction) -> InboxState {
    match action {
        InboxAction::ConversationsLoaded(conversations) => {
            state.conversations = EntityMap::default();
            for conversation in conversations {
                state.conversations.upsert(conversation.id, conversation);
            }
            sort_conversations(&mut state.conversations);
        }
        InboxAction::MessagesLoaded { conversation_id, messages } => {
            let stale = state.messages_by_conversation.remove(&conversation_id).unwrap_or_default();
            state.messages.all_ids.retain(|id| !stale.contains(id));
            for id in &stale {
                state.messages.by_id.remove(id);
            }

            for message in messages.into_iter().filter(|m| m.conversation_id == conversation_id) {
                insert_message(&mut state, message);
            }
        }
        InboxAction::MessageReceived { message, viewer_id } => {
            let conversation_id = message.conversation_id;
            let is_new = !state.messages.by_id.contains_key(&message.id);
            let incoming_unread = is_new
                && message.sender.id != viewer_id
                && message.read_at.is_none()
                && state.active_conversation != Some(conversation_id);

            if let Some(conversation) = state.conversations.by_id.get_mut(&conversation_id) {
                if conversation.last_message_at.is_none_or(|at| at <= message.created_at) {
                    conversation.last_message = Some(message.body.clone());
                    conversation.last_message_at = Some(message.created_at);
                }
                if incoming_unread {
                    conversation.unread_count += 1;
                }
            }

            insert_message(&mut state, message);
            sort_conversations(&mut state.conversations);
        }
        InboxAction::ActiveConversationChanged(conversation_id) => {
            state.active_conversation = conversation_id;
        }
        InboxAction::MessagesRead { conversation_id, reader_id, read_at } => {
            if let Some(ids) = state.messages_by_conversation.get(&conversation_id) {
                for id in ids {
                    if let Some(message) = state.messages.by_id.get_mut(id) {
                        if message.sender.id != reader_id && message.read_at.is_none() {
                            message.read_at = Some(read_at);
                        }
                    }
                }
            }
            if let Some(conversation) = state.conversations.by_id.get_mut(&conversation_id) {
                conversation.unread_count = 0;
            }
        }
        InboxAction::MatchesLoaded(matches) => {
            state.matches = EntityMap::default();
            for matched in matches {
                state.matches.upsert(matched.id, matched);
            }
            state.matches.sort_ids_by(|m| std::cmp::Reverse(m.updated_at));
        }
    }

    state
}

/// Inserts or replaces a message, keeping its conversation's id list ordered
/// by creation time. Receiving an id that is already present replaces it.
fn insert_message(state: &mut InboxState, message: Message) {
    let id = message.id;
    let conversation_id = message.conversation_id;

    state.messages.upsert(id, message);

    let ids = state.messages_by_conversation.entry(conversation_id).or_default();
    if !ids.contains(&id) {
        ids.push(id);
    }

    let by_id = &state.messages.by_id;
    ids.sort_by_key(|id| by_id.get(id).map(|m| (m.created_at, m.id)));
}

fn sort_conversations(conversations: &mut EntityMap<ConversationSummary>) {
    conversations.sort_ids_by(|c| std::cmp::Reverse(c.last_message_at.unwrap_or(c.created_at)));
}

impl InboxState {
    pub fn messages_for(&self, conversation_id: &Uuid) -> Vec<&Message> {
        self.messages_by_conversation
            .get(conversation_id)
            .map(|ids| ids.iter().filter_map(|id| self.messages.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn total_unread(&self) -> i64 {
        self.conversations.ordered().map(|c| c.unread_count).sum()
    }
}
