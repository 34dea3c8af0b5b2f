use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use derive_more::Display;
use serde::Serialize;
use uuid::Uuid;

use crate::settings::AppConfig;

/// Transactional emails the platform asks the mail service to send.
/// Serialized as `{"type": ..., "data": {...}}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum Notification {
    Welcome {
        to: String,
        name: String,
        role: String,
    },
    NewMessage {
        to: String,
        sender_name: String,
        conversation_id: Uuid,
        preview: String,
    },
    MatchInterest {
        to: String,
        from_name: String,
        match_id: Uuid,
        position_title: String,
    },
}

impl Notification {
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::Welcome { .. } => "welcome",
            Notification::NewMessage { .. } => "new-message",
            Notification::MatchInterest { .. } => "match-interest",
        }
    }
}

#[derive(Debug, Display)]
pub enum NotifyError {
    #[display("Email request failed: {_0}")]
    Request(String),

    #[display("Email service returned HTTP {_0}")]
    HttpStatus(u16),
}

impl std::error::Error for NotifyError {}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Request(err.to_string())
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Sends the notification in the background. Failures are logged and never
/// reach the caller.
pub fn dispatch(notifier: Arc<dyn Notifier>, notification: Notification) {
    tokio::spawn(async move {
        if let Err(e) = notifier.send(&notification).await {
            tracing::warn!(kind = notification.kind(), error = %e, "Email notification failed");
        }
    });
}

/// Posts notifications to the mail service's send endpoint.
pub struct EmailNotifier {
    client: reqwest::Client,
    endpoint: Option<String>,
    timeout: Duration,
}

impl EmailNotifier {
    pub fn new(config: &AppConfig) -> Self {
        EmailNotifier {
            client: reqwest::Client::new(),
            endpoint: config.email_endpoint.clone().filter(|e| !e.trim().is_empty()),
            timeout: Duration::from_secs(config.http_timeout_secs),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let Some(endpoint) = &self.endpoint else {
            tracing::debug!(kind = notification.kind(), "No email endpoint configured, skipping");
            return Ok(());
        };

        let response = self
            .client
            .post(endpoint)
            .json(notification)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::HttpStatus(response.status().as_u16()));
        }

        tracing::info!(kind = notification.kind(), "Email notification sent");
        Ok(())
    }
}
