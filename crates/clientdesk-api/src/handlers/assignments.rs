use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use clientdesk_db::{
    DeskPool,
    models::{NewProjectAssignment, ProjectAssignment},
};
use clientdesk_types::{ChangeAction, ChangeTable};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    dto::{AffectedRows, ApiResponse, AssignmentDTO, CreateAssignmentRequest},
    errors::ApiError,
    helpers::{Change, record_change},
};

#[utoipa::path(
    get,
    path = "/v1/projects/{project_id}/assignments",
    tag = "Assignments",
    params(("project_id" = Uuid, Path, description = "Project identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Users assigned to the project", body = ApiResponse<Vec<AssignmentDTO>>),
        (status = 403, description = "Admins only"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_project_assignments(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let assignments = state
        .pool
        .interact_with_context(
            format!("list assignments of project {project_id}"),
            move |conn| ProjectAssignment::find_by_project(project_id, conn),
        )
        .await?;

    let response: Vec<AssignmentDTO> = assignments.into_iter().map(AssignmentDTO::from).collect();
    Ok(Json(ApiResponse::ok(response)))
}

#[utoipa::path(
    get,
    path = "/v1/users/{user_id}/assignments",
    tag = "Assignments",
    params(("user_id" = Uuid, Path, description = "Profile identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Projects the user is assigned to", body = ApiResponse<Vec<AssignmentDTO>>),
        (status = 403, description = "Admins only"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_user_assignments(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let assignments = state
        .pool
        .interact_with_context(format!("list assignments of user {user_id}"), move |conn| {
            ProjectAssignment::find_by_user(user_id, conn)
        })
        .await?;

    let response: Vec<AssignmentDTO> = assignments.into_iter().map(AssignmentDTO::from).collect();
    Ok(Json(ApiResponse::ok(response)))
}

#[utoipa::path(
    post,
    path = "/v1/projects/{project_id}/assignments",
    tag = "Assignments",
    params(("project_id" = Uuid, Path, description = "Project identifier")),
    request_body = CreateAssignmentRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "User assigned", body = ApiResponse<AssignmentDTO>),
        (status = 400, description = "Unknown user or project"),
        (status = 403, description = "Admins only"),
        (status = 409, description = "User already assigned"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn assign_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<CreateAssignmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new_assignment = NewProjectAssignment {
        user_id: payload.user_id,
        project_id,
        role: payload.role,
    };

    let assignment = state
        .pool
        .interact_with_context(
            format!("assign user {} to project {project_id}", payload.user_id),
            move |conn| ProjectAssignment::create(&new_assignment, conn),
        )
        .await
        .map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => ApiError::Conflict(format!(
                "User {} is already assigned to project {project_id}",
                payload.user_id
            )),
            other => other,
        })?;

    tracing::info!(user_id = %assignment.user_id, project_id = %project_id, "User assigned to project");
    record_change(
        &state,
        &user,
        Change::new(
            ChangeTable::UserProjectAssignments,
            ChangeAction::Insert,
            assignment.id,
        )
        .in_project(Some(project_id))
        .with_details(serde_json::json!({ "user_id": assignment.user_id })),
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(AssignmentDTO::from(assignment))),
    ))
}

#[utoipa::path(
    delete,
    path = "/v1/projects/{project_id}/assignments/{user_id}",
    tag = "Assignments",
    params(
        ("project_id" = Uuid, Path, description = "Project identifier"),
        ("user_id" = Uuid, Path, description = "Profile identifier")
    ),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User unassigned", body = ApiResponse<AffectedRows>),
        (status = 403, description = "Admins only"),
        (status = 404, description = "No such assignment"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn unassign_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let affected = state
        .pool
        .interact_with_context(
            format!("unassign user {user_id} from project {project_id}"),
            move |conn| ProjectAssignment::delete(user_id, project_id, conn),
        )
        .await?;

    if affected == 0 {
        return Err(ApiError::NotFound(format!(
            "User {user_id} is not assigned to project {project_id}"
        )));
    }

    tracing::info!(user_id = %user_id, project_id = %project_id, "User unassigned from project");
    // The assignment row is gone, the feed carries the user id instead.
    record_change(
        &state,
        &user,
        Change::new(ChangeTable::UserProjectAssignments, ChangeAction::Delete, user_id)
            .in_project(Some(project_id)),
    )
    .await;

    Ok(Json(ApiResponse::ok(AffectedRows { affected })))
}
