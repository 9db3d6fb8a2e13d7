use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{Duration, Utc};
use clientdesk_db::{
    DeskPool,
    models::{Meeting, MeetingUpdate, NewMeeting},
};
use clientdesk_types::{ChangeAction, ChangeTable, MeetingStatus};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    dto::{
        AffectedRows, ApiResponse, CreateMeetingRequest, MeetingDTO, MeetingQuery,
        UpdateMeetingRequest,
    },
    errors::{ApiError, DatabaseErrorExt},
    helpers::{Change, ensure_not_blank, ensure_positive_duration, record_change},
};

const MAX_UPCOMING_DAYS: i64 = 90;

async fn load_meeting(state: &AppState, meeting_id: Uuid) -> Result<Meeting, ApiError> {
    state
        .pool
        .interact_with_context(format!("find meeting {meeting_id}"), move |conn| {
            Meeting::find_by_id(meeting_id, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("Meeting {meeting_id} not found")))
}

#[utoipa::path(
    get,
    path = "/v1/projects/{project_id}/meetings",
    tag = "Meetings",
    params(("project_id" = Uuid, Path, description = "Project identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Meetings of the project", body = ApiResponse<Vec<MeetingDTO>>),
        (status = 403, description = "Caller is not assigned to the project"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_project_meetings(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.ensure_project_access(&state, project_id).await?;

    let meetings = state
        .pool
        .interact_with_context(format!("list meetings of project {project_id}"), move |conn| {
            Meeting::find_by_project(project_id, conn)
        })
        .await?;

    let response: Vec<MeetingDTO> = meetings.into_iter().map(MeetingDTO::from).collect();
    Ok(Json(ApiResponse::ok(response)))
}

#[utoipa::path(
    get,
    path = "/v1/meetings/upcoming",
    tag = "Meetings",
    params(MeetingQuery),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Scheduled meetings in the coming days across visible projects", body = ApiResponse<Vec<MeetingDTO>>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_upcoming_meetings(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<MeetingQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let days = query.days.clamp(1, MAX_UPCOMING_DAYS);
    let from = Utc::now();
    let until = from + Duration::days(days);
    let project_ids = user.visible_projects(&state).await?;

    let meetings = state
        .pool
        .interact_with_context(format!("list meetings in the next {days} days"), move |conn| {
            Meeting::find_upcoming(from, until, project_ids, conn)
        })
        .await?;

    let response: Vec<MeetingDTO> = meetings.into_iter().map(MeetingDTO::from).collect();
    Ok(Json(ApiResponse::ok(response)))
}

#[utoipa::path(
    post,
    path = "/v1/projects/{project_id}/meetings",
    tag = "Meetings",
    params(("project_id" = Uuid, Path, description = "Project identifier")),
    request_body = CreateMeetingRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Meeting scheduled", body = ApiResponse<MeetingDTO>),
        (status = 400, description = "Invalid meeting payload"),
        (status = 403, description = "Staff assigned to the project only"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_meeting(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<CreateMeetingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_staff()?;
    user.ensure_project_access(&state, project_id).await?;
    ensure_not_blank("title", &payload.title)?;
    ensure_positive_duration(payload.duration_minutes)?;

    let new_meeting = NewMeeting {
        project_id,
        title: payload.title.trim().to_string(),
        description: payload.description,
        scheduled_at: payload.scheduled_at,
        duration_minutes: payload.duration_minutes,
        meeting_url: payload.meeting_url,
        status: MeetingStatus::Scheduled.as_str().to_string(),
        created_by: Some(user.id),
    };

    let meeting = state
        .pool
        .interact_with_context(format!("create meeting for project {project_id}"), move |conn| {
            Meeting::create(&new_meeting, conn)
        })
        .await?;

    tracing::info!(
        meeting_id = %meeting.id,
        project_id = %project_id,
        scheduled_at = %meeting.scheduled_at,
        "Meeting scheduled"
    );
    record_change(
        &state,
        &user,
        Change::new(ChangeTable::Meetings, ChangeAction::Insert, meeting.id)
            .in_project(Some(project_id))
            .with_details(serde_json::json!({
                "title": meeting.title,
                "scheduled_at": meeting.scheduled_at,
            })),
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(MeetingDTO::from(meeting))),
    ))
}

#[utoipa::path(
    patch,
    path = "/v1/meetings/{meeting_id}",
    tag = "Meetings",
    params(("meeting_id" = Uuid, Path, description = "Meeting identifier")),
    request_body = UpdateMeetingRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Meeting updated", body = ApiResponse<MeetingDTO>),
        (status = 400, description = "Invalid meeting payload"),
        (status = 403, description = "Staff assigned to the project only"),
        (status = 404, description = "Meeting not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_meeting(
    State(state): State<AppState>,
    user: AuthUser,
    Path(meeting_id): Path<Uuid>,
    Json(payload): Json<UpdateMeetingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_staff()?;
    let current = load_meeting(&state, meeting_id).await?;
    user.ensure_project_access(&state, current.project_id).await?;

    if let Some(title) = payload.title.as_deref() {
        ensure_not_blank("title", title)?;
    }
    if let Some(minutes) = payload.duration_minutes {
        ensure_positive_duration(minutes)?;
    }

    let updates = MeetingUpdate {
        title: payload.title.map(|t| t.trim().to_string()),
        description: payload.description,
        scheduled_at: payload.scheduled_at,
        duration_minutes: payload.duration_minutes,
        meeting_url: payload.meeting_url,
        status: payload.status.map(|s| s.as_str().to_string()),
        updated_at: Some(Utc::now()),
    };

    let meeting = state
        .pool
        .interact_with_context(format!("update meeting {meeting_id}"), move |conn| {
            Meeting::update(meeting_id, &updates, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("Meeting {meeting_id} not found")))?;

    record_change(
        &state,
        &user,
        Change::new(ChangeTable::Meetings, ChangeAction::Update, meeting.id)
            .in_project(Some(meeting.project_id))
            .with_details(serde_json::json!({ "status": meeting.status })),
    )
    .await;

    Ok(Json(ApiResponse::ok(MeetingDTO::from(meeting))))
}

#[utoipa::path(
    delete,
    path = "/v1/meetings/{meeting_id}",
    tag = "Meetings",
    params(("meeting_id" = Uuid, Path, description = "Meeting identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Meeting deleted", body = ApiResponse<AffectedRows>),
        (status = 403, description = "Staff assigned to the project only"),
        (status = 404, description = "Meeting not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_meeting(
    State(state): State<AppState>,
    user: AuthUser,
    Path(meeting_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_staff()?;
    let current = load_meeting(&state, meeting_id).await?;
    user.ensure_project_access(&state, current.project_id).await?;

    let affected = state
        .pool
        .interact_with_context(format!("delete meeting {meeting_id}"), move |conn| {
            Meeting::delete(meeting_id, conn)
        })
        .await?;

    record_change(
        &state,
        &user,
        Change::new(ChangeTable::Meetings, ChangeAction::Delete, meeting_id)
            .in_project(Some(current.project_id)),
    )
    .await;

    Ok(Json(ApiResponse::ok(AffectedRows { affected })))
}
