//! Chat delivery through the Slack Web API.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::SinkError;
use crate::models::message::{Attachment, ChatMessage};

/// What a successful [`ChatSink::deliver`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Sent,
    /// The sink is not configured; nothing left the process.
    Skipped,
}

/// Destination for formatted messages.
#[async_trait]
pub trait ChatSink: Send + Sync {
    async fn deliver(
        &self,
        channel: &str,
        message: &ChatMessage,
    ) -> Result<DeliveryStatus, SinkError>;

    /// Reply to an interactive action through its `response_url`.
    async fn respond(&self, response_url: &str, message: &ChatMessage) -> Result<(), SinkError>;
}

#[derive(Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "no_attachments")]
    attachments: &'a [Attachment],
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn no_attachments(attachments: &&[Attachment]) -> bool {
    attachments.is_empty()
}

/// Posts via `chat.postMessage` with a bot token.
#[derive(Clone)]
pub struct SlackSink {
    token: String,
    api_url: String,
    client: reqwest::Client,
}

impl SlackSink {
    pub fn new(token: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{method}", self.api_url)
    }
}

#[async_trait]
impl ChatSink for SlackSink {
    async fn deliver(
        &self,
        channel: &str,
        message: &ChatMessage,
    ) -> Result<DeliveryStatus, SinkError> {
        if self.token.is_empty() {
            tracing::debug!(channel, "Slack token not set, skipping delivery");
            return Ok(DeliveryStatus::Skipped);
        }

        let body = PostMessage {
            channel,
            text: message.text.as_deref(),
            attachments: &message.attachments,
        };

        let resp = self
            .client
            .post(self.method_url("chat.postMessage"))
            .bearer_auth(&self.token)
            .header("User-Agent", "jenkins-relay")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(SinkError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        // Slack answers 200 even on failure; the verdict is in the body.
        let reply: serde_json::Value = serde_json::from_str(&text).unwrap_or_default();
        if reply["ok"].as_bool() == Some(false) {
            let reason = reply["error"].as_str().unwrap_or("unknown_error");
            return Err(SinkError::Rejected(reason.to_string()));
        }

        tracing::debug!(channel, "Message delivered");
        Ok(DeliveryStatus::Sent)
    }

    async fn respond(&self, response_url: &str, message: &ChatMessage) -> Result<(), SinkError> {
        let resp = self
            .client
            .post(response_url)
            .header("User-Agent", "jenkins-relay")
            .json(message)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(SinkError::Status { status, body });
        }
        Ok(())
    }
}
