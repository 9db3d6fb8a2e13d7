use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use clientdesk_db::{DeskPool, models::Activity};

use crate::{
    AppState,
    auth::AuthUser,
    dto::{ActivityDTO, ActivityQuery, ApiResponse, clamp_limit},
    errors::ApiError,
};

#[utoipa::path(
    get,
    path = "/v1/activities",
    tag = "Activities",
    params(ActivityQuery),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Most recent activity first", body = ApiResponse<Vec<ActivityDTO>>),
        (status = 403, description = "Caller is not assigned to the project"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_activities(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ActivityQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = clamp_limit(query.limit);

    let activities = if let Some(project_id) = query.project_id {
        user.ensure_project_access(&state, project_id).await?;
        state
            .pool
            .interact_with_context(
                format!("list activity of project {project_id}"),
                move |conn| Activity::find_by_project(project_id, limit, conn),
            )
            .await?
    } else {
        let project_ids = user.visible_projects(&state).await?;
        state
            .pool
            .interact_with_context("list recent activity".to_string(), move |conn| {
                Activity::find_recent(project_ids, limit, conn)
            })
            .await?
    };

    let response: Vec<ActivityDTO> = activities.into_iter().map(ActivityDTO::from).collect();
    Ok(Json(ApiResponse::ok(response)))
}
