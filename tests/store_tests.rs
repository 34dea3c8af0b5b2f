mod test_utils;

use chrono::{Duration, Utc};
use test_utils::*;
use uuid::Uuid;

use chosn_backend::{
    codec::decode_all,
    entities::matching::Match,
    store::{reduce, InboxAction, InboxState},
    use_cases::inbox::assemble_inbox,
};

fn loaded_inbox(conversation_ids: &[Uuid]) -> InboxState {
    let base = Utc::now() - Duration::hours(1);
    let conversations = conversation_ids
        .iter()
        .enumerate()
        .map(|(i, id)| conversation_summary(*id, base + Duration::minutes(i as i64), None))
        .collect();

    reduce(InboxState::default(), InboxAction::ConversationsLoaded(conversations))
}

#[test]
fn conversations_are_ordered_by_latest_activity() {
    let older = Uuid::new_v4();
    let newer = Uuid::new_v4();

    let state = loaded_inbox(&[older, newer]);

    assert_eq!(state.conversations.all_ids, vec![newer, older]);
    assert_eq!(state.conversations.len(), 2);
}

#[test]
fn receiving_the_same_message_twice_stores_it_once() {
    let conversation_id = Uuid::new_v4();
    let viewer = Uuid::new_v4();
    let incoming = message(conversation_id, Uuid::new_v4(), "Hello there", Utc::now());

    let mut state = loaded_inbox(&[conversation_id]);
    for _ in 0..2 {
        state = reduce(
            state,
            InboxAction::MessageReceived {
                message: incoming.clone(),
                viewer_id: viewer,
            },
        );
    }

    assert_eq!(state.messages.len(), 1);
    assert_eq!(state.messages_for(&conversation_id).len(), 1);
    assert_eq!(state.conversations.get(&conversation_id).unwrap().unread_count, 1);
}

#[test]
fn own_messages_do_not_count_as_unread() {
    let conversation_id = Uuid::new_v4();
    let viewer = Uuid::new_v4();

    let state = reduce(
        loaded_inbox(&[conversation_id]),
        InboxAction::MessageReceived {
            message: message(conversation_id, viewer, "Sent by me", Utc::now()),
            viewer_id: viewer,
        },
    );

    let summary = state.conversations.get(&conversation_id).unwrap();
    assert_eq!(summary.unread_count, 0);
    assert_eq!(summary.last_message.as_deref(), Some("Sent by me"));
}

#[test]
fn messages_in_the_active_conversation_are_not_unread() {
    let conversation_id = Uuid::new_v4();
    let viewer = Uuid::new_v4();

    let state = reduce(
        loaded_inbox(&[conversation_id]),
        InboxAction::ActiveConversationChanged(Some(conversation_id)),
    );
    let state = reduce(
        state,
        InboxAction::MessageReceived {
            message: message(conversation_id, Uuid::new_v4(), "You there?", Utc::now()),
            viewer_id: viewer,
        },
    );

    assert_eq!(state.total_unread(), 0);
}

#[test]
fn new_message_moves_conversation_to_the_top() {
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let state = loaded_inbox(&[first, second]);
    assert_eq!(state.conversations.all_ids[0], second);

    let state = reduce(
        state,
        InboxAction::MessageReceived {
            message: message(first, Uuid::new_v4(), "Bump", Utc::now()),
            viewer_id: Uuid::new_v4(),
        },
    );

    assert_eq!(state.conversations.all_ids, vec![first, second]);
}

#[test]
fn loaded_history_is_sorted_and_replaces_the_previous_one() {
    let conversation_id = Uuid::new_v4();
    let sender = Uuid::new_v4();
    let now = Utc::now();

    let stale = message(conversation_id, sender, "stale", now - Duration::days(2));
    let state = reduce(
        InboxState::default(),
        InboxAction::MessagesLoaded {
            conversation_id,
            messages: vec![stale.clone()],
        },
    );

    let late = message(conversation_id, sender, "second", now);
    let early = message(conversation_id, sender, "first", now - Duration::minutes(5));
    let elsewhere = message(Uuid::new_v4(), sender, "other conversation", now);
    let state = reduce(
        state,
        InboxAction::MessagesLoaded {
            conversation_id,
            messages: vec![late, early, elsewhere],
        },
    );

    let bodies: Vec<&str> = state
        .messages_for(&conversation_id)
        .iter()
        .map(|m| m.body.as_str())
        .collect();
    assert_eq!(bodies, vec!["first", "second"]);
    assert!(state.messages.get(&stale.id).is_none());
    assert_eq!(state.messages.len(), 2);
}

#[test]
fn messages_read_marks_only_the_other_sides_messages() {
    let conversation_id = Uuid::new_v4();
    let reader = Uuid::new_v4();
    let other = Uuid::new_v4();
    let now = Utc::now();

    let mine = message(conversation_id, reader, "mine", now - Duration::minutes(2));
    let theirs = message(conversation_id, other, "theirs", now - Duration::minutes(1));

    let mut state = loaded_inbox(&[conversation_id]);
    for m in [mine.clone(), theirs.clone()] {
        state = reduce(
            state,
            InboxAction::MessageReceived {
                message: m,
                viewer_id: reader,
            },
        );
    }
    assert_eq!(state.total_unread(), 1);

    let state = reduce(
        state,
        InboxAction::MessagesRead {
            conversation_id,
            reader_id: reader,
            read_at: now,
        },
    );

    assert_eq!(state.messages.get(&theirs.id).unwrap().read_at, Some(now));
    assert_eq!(state.messages.get(&mine.id).unwrap().read_at, None);
    assert_eq!(state.total_unread(), 0);
}

#[test]
fn reducing_leaves_earlier_snapshots_untouched() {
    let conversation_id = Uuid::new_v4();
    let before = loaded_inbox(&[conversation_id]);
    let snapshot = before.clone();

    let after = reduce(
        before,
        InboxAction::MessageReceived {
            message: message(conversation_id, Uuid::new_v4(), "hi", Utc::now()),
            viewer_id: Uuid::new_v4(),
        },
    );

    assert!(snapshot.messages.is_empty());
    assert_ne!(snapshot, after);
}

#[test]
fn assembled_inbox_opens_the_requested_conversation() {
    let conversation_id = Uuid::new_v4();
    let developer = Uuid::new_v4();
    let company = Uuid::new_v4();
    let now = Utc::now();

    let older_match = {
        let mut row = match_row(Uuid::new_v4(), developer, company, "pending");
        row.updated_at = now - Duration::days(3);
        row
    };
    let newer_match = match_row(Uuid::new_v4(), developer, company, "mutual");
    let newer_id = newer_match.id;
    let matches: Vec<Match> = decode_all(vec![older_match, newer_match]).unwrap();

    let history = vec![message(conversation_id, company, "Welcome aboard", now)];

    let state = assemble_inbox(
        vec![conversation_summary(conversation_id, now - Duration::hours(2), Some(now))],
        matches,
        Some((conversation_id, history)),
    );

    assert_eq!(state.active_conversation, Some(conversation_id));
    assert_eq!(state.messages_for(&conversation_id).len(), 1);
    assert_eq!(state.matches.all_ids[0], newer_id);
    assert_eq!(state.matches.len(), 2);
}

#[test]
fn assembled_inbox_without_active_conversation() {
    let state = assemble_inbox(Vec::new(), Vec::new(), None);

    assert_eq!(state, InboxState::default());
    assert_eq!(state.total_unread(), 0);
}
