use crate::{
    dto::{ChatReply, WebhookEnvelope},
    error::ChatError,
};

#[async_trait::async_trait]
pub trait ChatRelay: Send + Sync {
    async fn relay(&self, envelope: &WebhookEnvelope) -> Result<ChatReply, ChatError>;
}
