//! Per-conversation fan-out of message events.
//!
//! [`RealtimeHub`] keeps one `tokio::sync::broadcast` channel per
//! conversation. Channels are created on first subscribe and removed by
//! [`RealtimeHub::prune_idle`] once no receiver is left. Delivery is best
//! effort: a receiver that falls behind is told to re-fetch instead of being
//! replayed the gap.

use std::{convert::Infallible, time::Duration};

use actix_web::web::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use futures::stream::{self, Stream, StreamExt};
use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};
use uuid::Uuid;

use crate::entities::messaging::Message;

const DEFAULT_CAPACITY: usize = 64;
pub const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(25);

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RealtimeEvent {
    NewMessage { message: Message },
    MessagesRead {
        conversation_id: Uuid,
        reader_id: Uuid,
        read_at: DateTime<Utc>,
    },
}

impl RealtimeEvent {
    fn name(&self) -> &'static str {
        match self {
            RealtimeEvent::NewMessage { .. } => "message",
            RealtimeEvent::MessagesRead { .. } => "read",
        }
    }
}

pub struct RealtimeHub {
    channels: DashMap<Uuid, broadcast::Sender<RealtimeEvent>>,
    capacity: usize,
}

impl Default for RealtimeHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl RealtimeHub {
    pub fn new(capacity: usize) -> Self {
        RealtimeHub {
            channels: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn subscribe(&self, conversation_id: Uuid) -> broadcast::Receiver<RealtimeEvent> {
        self.channels
            .entry(conversation_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Sends `event` to every current subscriber of the conversation and
    /// returns how many received it.
    pub fn publish(&self, conversation_id: Uuid, event: RealtimeEvent) -> usize {
        match self.channels.get(&conversation_id) {
            // Err only means every receiver is gone.
            Some(sender) => sender.send(event).unwrap_or(0),
            None => 0,
        }
    }

    /// Drops channels nobody listens to. Returns the number removed.
    pub fn prune_idle(&self) -> usize {
        let before = self.channels.len();
        self.channels.retain(|_, sender| sender.receiver_count() > 0);
        before.saturating_sub(self.channels.len())
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

/// Frames one Server-Sent Event.
pub fn sse_frame(event: &str, data: &str) -> Bytes {
    Bytes::from(format!("event: {event}\ndata: {data}\n\n"))
}

/// Turns a subscription into an SSE body. A lagged receiver yields a
/// `resync` event and keeps listening. The stream ends when the channel
/// closes; the subscription is dropped together with the response body.
pub fn sse_stream(
    receiver: broadcast::Receiver<RealtimeEvent>,
    conversation_id: Uuid,
    keep_alive: Duration,
) -> impl Stream<Item = Result<Bytes, Infallible>> {
    let ready = sse_frame("ready", &serde_json::json!({ "conversation_id": conversation_id }).to_string());

    let events = stream::unfold(receiver, move |mut receiver| async move {
        let frame = match tokio::time::timeout(keep_alive, receiver.recv()).await {
            Err(_) => Bytes::from_static(b": keep-alive\n\n"),
            Ok(Ok(event)) => match serde_json::to_string(&event) {
                Ok(data) => sse_frame(event.name(), &data),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to encode realtime event");
                    return None;
                }
            },
            Ok(Err(RecvError::Lagged(skipped))) => {
                tracing::warn!(%conversation_id, skipped, "Realtime subscriber lagged");
                sse_frame(
                    "resync",
                    &serde_json::json!({ "conversation_id": conversation_id, "skipped": skipped }).to_string(),
                )
            }
            Ok(Err(RecvError::Closed)) => return None,
        };
        Some((Ok(frame), receiver))
    });

    stream::once(async move { Ok(ready) }).chain(events)
}
