use uuid::Uuid;

use crate::{
    domain::store::{reduce, InboxAction, InboxState},
    entities::{
        matching::Match,
        messaging::{ConversationSummary, Message},
    },
};

/// Builds the caller's inbox snapshot from freshly fetched data.
/// When a conversation is open, its history is loaded and it becomes the
/// active conversation.
pub fn assemble_inbox(
    conversations: Vec<ConversationSummary>,
    matches: Vec<Match>,
    active: Option<(Uuid, Vec<Message>)>,
) -> InboxState {
    let mut actions = vec![
        InboxAction::ConversationsLoaded(conversations),
        InboxAction::MatchesLoaded(matches),
    ];

    if let Some((conversation_id, messages)) = active {
        actions.push(InboxAction::MessagesLoaded {
            conversation_id,
            messages,
        });
        actions.push(InboxAction::ActiveConversationChanged(Some(conversation_id)));
    }

    actions.into_iter().fold(InboxState::default(), reduce)
}
