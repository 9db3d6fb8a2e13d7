use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const ASSISTANT_SENDER: &str = "assistant";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<String>,
}

/// Body posted to the webhook.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookEnvelope {
    pub message: String,
    pub session_id: String,
    pub user_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

impl WebhookEnvelope {
    /// A missing session id starts a new conversation.
    pub fn new(request: ChatRequest, user_id: Uuid, timestamp: DateTime<Utc>) -> Self {
        Self {
            message: request.message,
            session_id: request
                .session_id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            user_id,
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ChatReply {
    pub content: String,
    pub sender: String,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_keeps_or_creates_the_session() {
        let user = Uuid::new_v4();
        let now = Utc::now();

        let kept = WebhookEnvelope::new(
            ChatRequest {
                message: "hi".to_string(),
                session_id: Some("abc".to_string()),
            },
            user,
            now,
        );
        assert_eq!(kept.session_id, "abc");

        let fresh = WebhookEnvelope::new(
            ChatRequest {
                message: "hi".to_string(),
                session_id: Some("  ".to_string()),
            },
            user,
            now,
        );
        assert!(Uuid::parse_str(&fresh.session_id).is_ok());
    }

    #[test]
    fn envelope_serializes_the_webhook_fields() {
        let envelope = WebhookEnvelope {
            message: "status?".to_string(),
            session_id: "s-1".to_string(),
            user_id: Uuid::nil(),
            timestamp: Utc::now(),
        };

        let json = serde_json::to_value(&envelope).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["message", "session_id", "timestamp", "user_id"]);
    }
}
