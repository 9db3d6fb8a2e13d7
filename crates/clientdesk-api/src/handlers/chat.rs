use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use chrono::Utc;
use clientdesk_chat::{ChatRelay, ChatReply, ChatRequest, WebhookEnvelope};
use clientdesk_metrics::{ChatMetrics, RelayOutcome};
use uuid::Uuid;

use crate::{AppState, auth::AuthUser, dto::ApiResponse, errors::ApiError};

async fn relay_message(
    relay: Option<&Arc<dyn ChatRelay>>,
    metrics: &ChatMetrics,
    request: ChatRequest,
    user_id: Uuid,
) -> Result<ChatReply, ApiError> {
    let Some(relay) = relay else {
        return Err(ApiError::ServiceUnavailable(
            "Chat assistant is not configured".to_string(),
        ));
    };

    if request.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }

    let envelope = WebhookEnvelope::new(request, user_id, Utc::now());
    match relay.relay(&envelope).await {
        Ok(reply) => {
            metrics.record_relayed(RelayOutcome::Delivered);
            Ok(reply)
        }
        Err(e) => {
            metrics.record_relayed(RelayOutcome::Failed);
            Err(e.into())
        }
    }
}

#[utoipa::path(
    post,
    path = "/v1/chat",
    tag = "Chat",
    request_body = ChatRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Normalized assistant reply", body = ApiResponse<ChatReply>),
        (status = 400, description = "Empty message"),
        (status = 502, description = "Assistant webhook failed"),
        (status = 503, description = "Chat assistant is not configured"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn send_chat_message(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ChatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let reply = relay_message(state.chat.as_ref(), &state.metrics.chat, payload, user.id).await?;

    tracing::debug!(user_id = %user.id, session_id = %reply.session_id, "Chat reply relayed");
    Ok(Json(ApiResponse::ok(reply)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clientdesk_chat::ChatError;
    use clientdesk_metrics::MetricsRegistry;

    struct EchoRelay;

    #[async_trait::async_trait]
    impl ChatRelay for EchoRelay {
        async fn relay(&self, envelope: &WebhookEnvelope) -> Result<ChatReply, ChatError> {
            Ok(ChatReply {
                content: format!("echo: {}", envelope.message),
                sender: "assistant".to_string(),
                session_id: envelope.session_id.clone(),
                timestamp: envelope.timestamp,
            })
        }
    }

    struct DownRelay;

    #[async_trait::async_trait]
    impl ChatRelay for DownRelay {
        async fn relay(&self, _envelope: &WebhookEnvelope) -> Result<ChatReply, ChatError> {
            Err(ChatError::UpstreamStatus(503))
        }
    }

    fn request(message: &str) -> ChatRequest {
        ChatRequest {
            message: message.to_string(),
            session_id: Some("session-1".to_string()),
        }
    }

    #[tokio::test]
    async fn replies_are_relayed_within_the_session() {
        let metrics = MetricsRegistry::new();
        let relay: Arc<dyn ChatRelay> = Arc::new(EchoRelay);

        let reply = relay_message(Some(&relay), &metrics.chat, request("hello"), Uuid::nil())
            .await
            .unwrap();

        assert_eq!(reply.content, "echo: hello");
        assert_eq!(reply.session_id, "session-1");
    }

    #[tokio::test]
    async fn missing_relay_is_unavailable_and_failures_are_bad_gateway() {
        let metrics = MetricsRegistry::new();

        let unconfigured = relay_message(None, &metrics.chat, request("hello"), Uuid::nil()).await;
        assert!(matches!(unconfigured, Err(ApiError::ServiceUnavailable(_))));

        let relay: Arc<dyn ChatRelay> = Arc::new(DownRelay);
        let failed = relay_message(Some(&relay), &metrics.chat, request("hello"), Uuid::nil()).await;
        assert!(matches!(failed, Err(ApiError::BadGateway(_))));

        let blank = relay_message(Some(&relay), &metrics.chat, request("  "), Uuid::nil()).await;
        assert!(matches!(blank, Err(ApiError::BadRequest(_))));
    }
}
