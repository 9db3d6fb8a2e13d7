use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use clientdesk_db::{DeskPool, models::Notification};
use clientdesk_types::{ChangeAction, ChangeTable};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    dto::{
        AffectedRows, ApiResponse, NotificationDTO, NotificationQuery, UnreadCountDTO,
        clamp_limit,
    },
    errors::{ApiError, DatabaseErrorExt},
};

#[utoipa::path(
    get,
    path = "/v1/notifications",
    tag = "Notifications",
    params(NotificationQuery),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Caller's notifications, newest first", body = ApiResponse<Vec<NotificationDTO>>),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<NotificationQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = user.id;
    let limit = clamp_limit(query.limit);

    let notifications = state
        .pool
        .interact_with_context(format!("list notifications of {user_id}"), move |conn| {
            Notification::find_by_user(user_id, query.unread_only, limit, conn)
        })
        .await?;

    let response: Vec<NotificationDTO> =
        notifications.into_iter().map(NotificationDTO::from).collect();
    Ok(Json(ApiResponse::ok(response)))
}

#[utoipa::path(
    get,
    path = "/v1/notifications/unread-count",
    tag = "Notifications",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Number of unread notifications", body = ApiResponse<UnreadCountDTO>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn unread_notification_count(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = user.id;

    let unread = state
        .pool
        .interact_with_context(format!("count unread notifications of {user_id}"), move |conn| {
            Notification::unread_count(user_id, conn)
        })
        .await?;

    Ok(Json(ApiResponse::ok(UnreadCountDTO { unread })))
}

#[utoipa::path(
    post,
    path = "/v1/notifications/{notification_id}/read",
    tag = "Notifications",
    params(("notification_id" = Uuid, Path, description = "Notification identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Notification marked read", body = ApiResponse<NotificationDTO>),
        (status = 404, description = "Notification not found for the caller"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(notification_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = user.id;

    let notification = state
        .pool
        .interact_with_context(
            format!("mark notification {notification_id} read"),
            move |conn| Notification::mark_read(notification_id, user_id, conn),
        )
        .await
        .map_err(|e| e.or_not_found(format!("Notification {notification_id} not found")))?;

    // Read state is per-user bookkeeping, it publishes but leaves no activity trail.
    state.feed.publish(
        ChangeTable::Notifications,
        ChangeAction::Update,
        notification.id,
    );

    Ok(Json(ApiResponse::ok(NotificationDTO::from(notification))))
}

#[utoipa::path(
    post,
    path = "/v1/notifications/read-all",
    tag = "Notifications",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Every unread notification of the caller marked read", body = ApiResponse<AffectedRows>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = user.id;

    let affected = state
        .pool
        .interact_with_context(format!("mark all notifications of {user_id} read"), move |conn| {
            Notification::mark_all_read(user_id, conn)
        })
        .await?;

    if affected > 0 {
        state
            .feed
            .publish(ChangeTable::Notifications, ChangeAction::Update, user_id);
    }

    Ok(Json(ApiResponse::ok(AffectedRows { affected })))
}
