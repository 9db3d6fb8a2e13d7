use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};

use crate::{
    AppState,
    auth::AuthUser,
    dto::RealtimeQuery,
    errors::ApiError,
    realtime::{ChangeSubscription, TableFilter},
};

#[utoipa::path(
    get,
    path = "/v1/realtime",
    tag = "Realtime",
    params(
        RealtimeQuery,
        ("access_token" = Option<String>, Query, description = "Bearer token for clients that cannot set headers")
    ),
    security(("bearer" = [])),
    responses(
        (status = 101, description = "Switching to a websocket streaming ChangeEvent JSON frames"),
        (status = 400, description = "Unknown table in the filter"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Table not visible to the caller's role")
    )
)]
pub async fn realtime_ws(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<RealtimeQuery>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, ApiError> {
    let filter = TableFilter::parse(query.tables.as_deref())
        .map_err(ApiError::BadRequest)?
        .scoped_to(user.role)
        .map_err(|table| ApiError::Forbidden(format!("Cannot subscribe to {table}")))?;
    let subscription = state.feed.subscribe(filter);

    tracing::info!(user_id = %user.id, tables = ?query.tables, "Realtime subscriber connected");
    Ok(ws.on_upgrade(move |socket| forward_changes(socket, subscription, user)))
}

async fn forward_changes(socket: WebSocket, mut subscription: ChangeSubscription, user: AuthUser) {
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            event = subscription.next() => {
                let Some(event) = event else {
                    tracing::debug!("Change feed closed");
                    break;
                };
                let json = match serde_json::to_string(&event) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to encode change event");
                        continue;
                    }
                };
                if sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(error = %e, "Realtime socket error");
                        break;
                    }
                }
            }
        }
    }

    tracing::info!(user_id = %user.id, "Realtime subscriber disconnected");
}
