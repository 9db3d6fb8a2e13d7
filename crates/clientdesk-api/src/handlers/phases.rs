use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use clientdesk_db::{
    DeskPool,
    models::{NewPhase, Phase, PhaseUpdate},
};
use clientdesk_types::{ChangeAction, ChangeTable};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    dto::{AffectedRows, ApiResponse, CreatePhaseRequest, PhaseDTO, UpdatePhaseRequest},
    errors::{ApiError, DatabaseErrorExt},
    helpers::{Change, ensure_date_order, ensure_not_blank, record_change},
};

async fn load_phase(state: &AppState, phase_id: Uuid) -> Result<Phase, ApiError> {
    state
        .pool
        .interact_with_context(format!("find phase {phase_id}"), move |conn| {
            Phase::find_by_id(phase_id, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("Phase {phase_id} not found")))
}

#[utoipa::path(
    get,
    path = "/v1/projects/{project_id}/phases",
    tag = "Phases",
    params(("project_id" = Uuid, Path, description = "Project identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Phases in display order with their current status", body = ApiResponse<Vec<PhaseDTO>>),
        (status = 403, description = "Caller is not assigned to the project"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_project_phases(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.ensure_project_access(&state, project_id).await?;

    let phases = state
        .pool
        .interact_with_context(format!("list phases of project {project_id}"), move |conn| {
            Phase::find_by_project(project_id, conn)
        })
        .await?;

    let today = Utc::now().date_naive();
    let response: Vec<PhaseDTO> = phases
        .into_iter()
        .map(|phase| PhaseDTO::from_phase(phase, today))
        .collect();
    Ok(Json(ApiResponse::ok(response)))
}

#[utoipa::path(
    post,
    path = "/v1/projects/{project_id}/phases",
    tag = "Phases",
    params(("project_id" = Uuid, Path, description = "Project identifier")),
    request_body = CreatePhaseRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Phase created", body = ApiResponse<PhaseDTO>),
        (status = 400, description = "Invalid phase window"),
        (status = 403, description = "Staff assigned to the project only"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_phase(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<CreatePhaseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_staff()?;
    user.ensure_project_access(&state, project_id).await?;
    ensure_not_blank("name", &payload.name)?;
    ensure_date_order(Some(payload.start_date), Some(payload.end_date))?;

    let new_phase = NewPhase {
        project_id,
        name: payload.name.trim().to_string(),
        description: payload.description,
        start_date: payload.start_date,
        end_date: payload.end_date,
        sort_order: payload.sort_order,
    };

    let phase = state
        .pool
        .interact_with_context(format!("create phase for project {project_id}"), move |conn| {
            Phase::create(&new_phase, conn)
        })
        .await?;

    record_change(
        &state,
        &user,
        Change::new(ChangeTable::Phases, ChangeAction::Insert, phase.id)
            .in_project(Some(project_id))
            .with_details(serde_json::json!({ "name": phase.name })),
    )
    .await;

    let today = Utc::now().date_naive();
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(PhaseDTO::from_phase(phase, today))),
    ))
}

#[utoipa::path(
    patch,
    path = "/v1/phases/{phase_id}",
    tag = "Phases",
    params(("phase_id" = Uuid, Path, description = "Phase identifier")),
    request_body = UpdatePhaseRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Phase updated", body = ApiResponse<PhaseDTO>),
        (status = 400, description = "Invalid phase window"),
        (status = 403, description = "Staff assigned to the project only"),
        (status = 404, description = "Phase not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_phase(
    State(state): State<AppState>,
    user: AuthUser,
    Path(phase_id): Path<Uuid>,
    Json(payload): Json<UpdatePhaseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_staff()?;
    let current = load_phase(&state, phase_id).await?;
    user.ensure_project_access(&state, current.project_id).await?;

    if let Some(name) = payload.name.as_deref() {
        ensure_not_blank("name", name)?;
    }
    // Partial updates are checked against the stored window.
    ensure_date_order(
        Some(payload.start_date.unwrap_or(current.start_date)),
        Some(payload.end_date.unwrap_or(current.end_date)),
    )?;

    let updates = PhaseUpdate {
        name: payload.name.map(|n| n.trim().to_string()),
        description: payload.description,
        start_date: payload.start_date,
        end_date: payload.end_date,
        sort_order: payload.sort_order,
        updated_at: Some(Utc::now()),
    };

    let phase = state
        .pool
        .interact_with_context(format!("update phase {phase_id}"), move |conn| {
            Phase::update(phase_id, &updates, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("Phase {phase_id} not found")))?;

    record_change(
        &state,
        &user,
        Change::new(ChangeTable::Phases, ChangeAction::Update, phase.id)
            .in_project(Some(phase.project_id)),
    )
    .await;

    let today = Utc::now().date_naive();
    Ok(Json(ApiResponse::ok(PhaseDTO::from_phase(phase, today))))
}

#[utoipa::path(
    delete,
    path = "/v1/phases/{phase_id}",
    tag = "Phases",
    params(("phase_id" = Uuid, Path, description = "Phase identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Phase deleted", body = ApiResponse<AffectedRows>),
        (status = 403, description = "Staff assigned to the project only"),
        (status = 404, description = "Phase not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_phase(
    State(state): State<AppState>,
    user: AuthUser,
    Path(phase_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_staff()?;
    let current = load_phase(&state, phase_id).await?;
    user.ensure_project_access(&state, current.project_id).await?;

    let affected = state
        .pool
        .interact_with_context(format!("delete phase {phase_id}"), move |conn| {
            Phase::delete(phase_id, conn)
        })
        .await?;

    record_change(
        &state,
        &user,
        Change::new(ChangeTable::Phases, ChangeAction::Delete, phase_id)
            .in_project(Some(current.project_id)),
    )
    .await;

    Ok(Json(ApiResponse::ok(AffectedRows { affected })))
}
