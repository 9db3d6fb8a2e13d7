use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use clientdesk_db::{
    DeskPool,
    models::{NewProject, Project, ProjectFilter, ProjectUpdate},
};
use clientdesk_types::{ChangeAction, ChangeTable, ProjectStatus};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    dto::{
        AffectedRows, ApiResponse, CreateProjectRequest, ProjectDTO, ProjectQuery,
        UpdateProjectRequest,
    },
    errors::{ApiError, DatabaseErrorExt},
    helpers::{Change, ensure_date_order, ensure_not_blank, parse_optional_amount, record_change},
};

#[utoipa::path(
    get,
    path = "/v1/projects",
    tag = "Projects",
    params(ProjectQuery),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Projects visible to the caller", body = ApiResponse<Vec<ProjectDTO>>),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_projects(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ProjectQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = ProjectFilter {
        search: query.search,
        status: query.status.map(|s| s.as_str().to_string()),
        client_id: query.client_id,
        assigned_to: (!user.is_admin()).then_some(user.id),
    };

    let projects = state
        .pool
        .interact_with_context("list projects".to_string(), move |conn| {
            Project::find_filtered(&filter, conn)
        })
        .await?;

    let response: Vec<ProjectDTO> = projects.into_iter().map(ProjectDTO::from).collect();
    Ok(Json(ApiResponse::ok(response)))
}

#[utoipa::path(
    get,
    path = "/v1/projects/{project_id}",
    tag = "Projects",
    params(("project_id" = Uuid, Path, description = "Project identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Project details", body = ApiResponse<ProjectDTO>),
        (status = 403, description = "Caller is not assigned to the project"),
        (status = 404, description = "Project not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.ensure_project_access(&state, project_id).await?;

    let project = state
        .pool
        .interact_with_context(format!("find project {project_id}"), move |conn| {
            Project::find_by_id(project_id, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("Project {project_id} not found")))?;

    Ok(Json(ApiResponse::ok(ProjectDTO::from(project))))
}

#[utoipa::path(
    post,
    path = "/v1/projects",
    tag = "Projects",
    request_body = CreateProjectRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Project created", body = ApiResponse<ProjectDTO>),
        (status = 400, description = "Invalid project payload"),
        (status = 403, description = "Admins only"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_project(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    ensure_not_blank("name", &payload.name)?;
    ensure_date_order(payload.start_date, payload.end_date)?;

    let new_project = NewProject {
        name: payload.name.trim().to_string(),
        description: payload.description,
        status: payload
            .status
            .unwrap_or(ProjectStatus::Planning)
            .as_str()
            .to_string(),
        client_id: payload.client_id,
        budget: parse_optional_amount("budget", payload.budget.as_deref())?,
        currency: payload.currency.unwrap_or_default().as_str().to_string(),
        start_date: payload.start_date,
        end_date: payload.end_date,
    };

    let project = state
        .pool
        .interact_with_context(format!("create project {}", new_project.name), move |conn| {
            Project::create(&new_project, conn)
        })
        .await?;

    tracing::info!(project_id = %project.id, name = %project.name, "Project created");
    record_change(
        &state,
        &user,
        Change::new(ChangeTable::Projects, ChangeAction::Insert, project.id)
            .in_project(Some(project.id)),
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(ProjectDTO::from(project))),
    ))
}

#[utoipa::path(
    patch,
    path = "/v1/projects/{project_id}",
    tag = "Projects",
    params(("project_id" = Uuid, Path, description = "Project identifier")),
    request_body = UpdateProjectRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Project updated", body = ApiResponse<ProjectDTO>),
        (status = 400, description = "Invalid project payload"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Project not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<UpdateProjectRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    if let Some(name) = payload.name.as_deref() {
        ensure_not_blank("name", name)?;
    }

    let current = state
        .pool
        .interact_with_context(format!("find project {project_id}"), move |conn| {
            Project::find_by_id(project_id, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("Project {project_id} not found")))?;

    ensure_date_order(
        payload.start_date.or(current.start_date),
        payload.end_date.or(current.end_date),
    )?;

    let updates = ProjectUpdate {
        name: payload.name.map(|n| n.trim().to_string()),
        description: payload.description,
        status: payload.status.map(|s| s.as_str().to_string()),
        client_id: payload.client_id,
        budget: parse_optional_amount("budget", payload.budget.as_deref())?,
        currency: payload.currency.map(|c| c.as_str().to_string()),
        start_date: payload.start_date,
        end_date: payload.end_date,
        updated_at: Some(Utc::now()),
    };

    let project = state
        .pool
        .interact_with_context(format!("update project {project_id}"), move |conn| {
            Project::update(project_id, &updates, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("Project {project_id} not found")))?;

    record_change(
        &state,
        &user,
        Change::new(ChangeTable::Projects, ChangeAction::Update, project.id)
            .in_project(Some(project.id))
            .with_details(serde_json::json!({ "status": project.status })),
    )
    .await;

    Ok(Json(ApiResponse::ok(ProjectDTO::from(project))))
}

#[utoipa::path(
    delete,
    path = "/v1/projects/{project_id}",
    tag = "Projects",
    params(("project_id" = Uuid, Path, description = "Project identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Project deleted", body = ApiResponse<AffectedRows>),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Project not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;

    let affected = state
        .pool
        .interact_with_context(format!("delete project {project_id}"), move |conn| {
            Project::delete(project_id, conn)
        })
        .await?;

    if affected == 0 {
        return Err(ApiError::NotFound(format!("Project {project_id} not found")));
    }

    // Activity rows cascade with the project, so only the feed is notified.
    state
        .feed
        .publish(ChangeTable::Projects, ChangeAction::Delete, project_id);

    Ok(Json(ApiResponse::ok(AffectedRows { affected })))
}
