use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, header::CONTENT_TYPE};
use url::Url;

use crate::{
    dto::{ASSISTANT_SENDER, ChatReply, WebhookEnvelope},
    error::ChatError,
    normalize::normalize_reply,
    traits::ChatRelay,
};

pub const SOURCE_HEADER: &str = "X-Clientdesk-Source";
pub const SOURCE_VALUE: &str = "dashboard-chat";

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(30);

pub struct WebhookChatClient {
    http_client: Client,
    webhook_url: Url,
}

impl WebhookChatClient {
    pub fn new(webhook_url: Url) -> Result<Self, ChatError> {
        Ok(Self {
            http_client: http_client()?,
            webhook_url,
        })
    }

    pub const fn webhook_url(&self) -> &Url {
        &self.webhook_url
    }
}

#[async_trait::async_trait]
impl ChatRelay for WebhookChatClient {
    async fn relay(&self, envelope: &WebhookEnvelope) -> Result<ChatReply, ChatError> {
        let response = self
            .http_client
            .post(self.webhook_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(SOURCE_HEADER, SOURCE_VALUE)
            .json(envelope)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Chat webhook rejected the message");
            return Err(ChatError::UpstreamStatus(status.as_u16()));
        }

        let body = response.text().await?;
        let content = normalize_reply(&body).ok_or(ChatError::EmptyReply)?;

        Ok(ChatReply {
            content,
            sender: ASSISTANT_SENDER.to_string(),
            session_id: envelope.session_id.clone(),
            timestamp: Utc::now(),
        })
    }
}

pub fn http_client() -> Result<Client, ChatError> {
    Client::builder()
        .timeout(WEBHOOK_TIMEOUT)
        .build()
        .map_err(|e| {
            tracing::error!("Failed to build HTTP client: {}", e);
            ChatError::InternalServerError
        })
}
