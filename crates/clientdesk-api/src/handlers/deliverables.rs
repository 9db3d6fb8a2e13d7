use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use clientdesk_db::{
    DeskPool,
    models::{Deliverable, DeliverableUpdate, NewDeliverable},
};
use clientdesk_types::{Bucket, ChangeAction, ChangeTable, DeliverableStatus};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    dto::{
        AffectedRows, ApiResponse, CreateDeliverableRequest, DeliverableDTO,
        UpdateDeliverableRequest,
    },
    errors::{ApiError, DatabaseErrorExt},
    helpers::{Change, ensure_not_blank, record_change},
    storage::ObjectKey,
};

async fn load_deliverable(state: &AppState, deliverable_id: Uuid) -> Result<Deliverable, ApiError> {
    state
        .pool
        .interact_with_context(format!("find deliverable {deliverable_id}"), move |conn| {
            Deliverable::find_by_id(deliverable_id, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("Deliverable {deliverable_id} not found")))
}

/// Attachments are grouped per project and deliverable.
pub fn attachment_key(
    project_id: Uuid,
    deliverable_id: Uuid,
    file_name: &str,
) -> Result<ObjectKey, ApiError> {
    if file_name.contains('/') {
        return Err(ApiError::BadRequest(
            "file_name must not contain '/'".to_string(),
        ));
    }
    Ok(ObjectKey::parse(&format!(
        "{project_id}/{deliverable_id}/{file_name}"
    ))?)
}

#[utoipa::path(
    get,
    path = "/v1/projects/{project_id}/deliverables",
    tag = "Deliverables",
    params(("project_id" = Uuid, Path, description = "Project identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Deliverables of the project", body = ApiResponse<Vec<DeliverableDTO>>),
        (status = 403, description = "Caller is not assigned to the project"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_project_deliverables(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.ensure_project_access(&state, project_id).await?;

    let deliverables = state
        .pool
        .interact_with_context(
            format!("list deliverables of project {project_id}"),
            move |conn| Deliverable::find_by_project(project_id, conn),
        )
        .await?;

    let response: Vec<DeliverableDTO> = deliverables.into_iter().map(DeliverableDTO::from).collect();
    Ok(Json(ApiResponse::ok(response)))
}

#[utoipa::path(
    get,
    path = "/v1/deliverables/{deliverable_id}",
    tag = "Deliverables",
    params(("deliverable_id" = Uuid, Path, description = "Deliverable identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Deliverable details", body = ApiResponse<DeliverableDTO>),
        (status = 403, description = "Caller is not assigned to the project"),
        (status = 404, description = "Deliverable not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_deliverable(
    State(state): State<AppState>,
    user: AuthUser,
    Path(deliverable_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deliverable = load_deliverable(&state, deliverable_id).await?;
    user.ensure_project_access(&state, deliverable.project_id).await?;

    Ok(Json(ApiResponse::ok(DeliverableDTO::from(deliverable))))
}

#[utoipa::path(
    post,
    path = "/v1/projects/{project_id}/deliverables",
    tag = "Deliverables",
    params(("project_id" = Uuid, Path, description = "Project identifier")),
    request_body = CreateDeliverableRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Deliverable created", body = ApiResponse<DeliverableDTO>),
        (status = 400, description = "Invalid deliverable payload"),
        (status = 403, description = "Staff assigned to the project only"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_deliverable(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<CreateDeliverableRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_staff()?;
    user.ensure_project_access(&state, project_id).await?;
    ensure_not_blank("title", &payload.title)?;

    let new_deliverable = NewDeliverable {
        project_id,
        title: payload.title.trim().to_string(),
        description: payload.description,
        status: payload
            .status
            .unwrap_or(DeliverableStatus::Pending)
            .as_str()
            .to_string(),
        due_date: payload.due_date,
    };

    let deliverable = state
        .pool
        .interact_with_context(
            format!("create deliverable for project {project_id}"),
            move |conn| Deliverable::create(&new_deliverable, conn),
        )
        .await?;

    record_change(
        &state,
        &user,
        Change::new(ChangeTable::Deliverables, ChangeAction::Insert, deliverable.id)
            .in_project(Some(project_id))
            .with_details(serde_json::json!({ "title": deliverable.title })),
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(DeliverableDTO::from(deliverable))),
    ))
}

#[utoipa::path(
    patch,
    path = "/v1/deliverables/{deliverable_id}",
    tag = "Deliverables",
    params(("deliverable_id" = Uuid, Path, description = "Deliverable identifier")),
    request_body = UpdateDeliverableRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Deliverable updated", body = ApiResponse<DeliverableDTO>),
        (status = 400, description = "Invalid deliverable payload"),
        (status = 403, description = "Staff assigned to the project only"),
        (status = 404, description = "Deliverable not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_deliverable(
    State(state): State<AppState>,
    user: AuthUser,
    Path(deliverable_id): Path<Uuid>,
    Json(payload): Json<UpdateDeliverableRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_staff()?;
    let current = load_deliverable(&state, deliverable_id).await?;
    user.ensure_project_access(&state, current.project_id).await?;

    if let Some(title) = payload.title.as_deref() {
        ensure_not_blank("title", title)?;
    }
    if let Some(file_path) = payload.file_path.as_deref() {
        ObjectKey::parse(file_path)?;
    }

    let updates = DeliverableUpdate {
        title: payload.title.map(|t| t.trim().to_string()),
        description: payload.description,
        status: payload.status.map(|s| s.as_str().to_string()),
        due_date: payload.due_date,
        file_path: payload.file_path,
        updated_at: Some(Utc::now()),
    };

    let deliverable = state
        .pool
        .interact_with_context(format!("update deliverable {deliverable_id}"), move |conn| {
            Deliverable::update(deliverable_id, &updates, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("Deliverable {deliverable_id} not found")))?;

    record_change(
        &state,
        &user,
        Change::new(ChangeTable::Deliverables, ChangeAction::Update, deliverable.id)
            .in_project(Some(deliverable.project_id))
            .with_details(serde_json::json!({ "status": deliverable.status })),
    )
    .await;

    Ok(Json(ApiResponse::ok(DeliverableDTO::from(deliverable))))
}

#[utoipa::path(
    put,
    path = "/v1/deliverables/{deliverable_id}/file/{file_name}",
    tag = "Deliverables",
    params(
        ("deliverable_id" = Uuid, Path, description = "Deliverable identifier"),
        ("file_name" = String, Path, description = "Name of the attached file")
    ),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "File stored in project-documents and attached", body = ApiResponse<DeliverableDTO>),
        (status = 400, description = "Empty upload or invalid file name"),
        (status = 403, description = "Staff assigned to the project only"),
        (status = 404, description = "Deliverable not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn upload_deliverable_file(
    State(state): State<AppState>,
    user: AuthUser,
    Path((deliverable_id, file_name)): Path<(Uuid, String)>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    user.require_staff()?;
    if body.is_empty() {
        return Err(ApiError::BadRequest("File upload is empty".to_string()));
    }

    let current = load_deliverable(&state, deliverable_id).await?;
    user.ensure_project_access(&state, current.project_id).await?;

    let key = attachment_key(current.project_id, deliverable_id, &file_name)?;
    let object = state.store.put(Bucket::ProjectDocuments, &key, &body).await?;

    let updates = DeliverableUpdate {
        file_path: Some(object.key.clone()),
        updated_at: Some(Utc::now()),
        ..Default::default()
    };

    let deliverable = state
        .pool
        .interact_with_context(
            format!("attach file to deliverable {deliverable_id}"),
            move |conn| Deliverable::update(deliverable_id, &updates, conn),
        )
        .await
        .map_err(|e| e.or_not_found(format!("Deliverable {deliverable_id} not found")))?;

    tracing::info!(
        deliverable_id = %deliverable_id,
        key = %object.key,
        size = object.size,
        "Deliverable file uploaded"
    );
    record_change(
        &state,
        &user,
        Change::new(ChangeTable::Deliverables, ChangeAction::Update, deliverable.id)
            .in_project(Some(deliverable.project_id))
            .with_details(serde_json::json!({ "file_path": object.key })),
    )
    .await;

    Ok(Json(ApiResponse::ok(DeliverableDTO::from(deliverable))))
}

#[utoipa::path(
    delete,
    path = "/v1/deliverables/{deliverable_id}",
    tag = "Deliverables",
    params(("deliverable_id" = Uuid, Path, description = "Deliverable identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Deliverable deleted", body = ApiResponse<AffectedRows>),
        (status = 403, description = "Staff assigned to the project only"),
        (status = 404, description = "Deliverable not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_deliverable(
    State(state): State<AppState>,
    user: AuthUser,
    Path(deliverable_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_staff()?;
    let current = load_deliverable(&state, deliverable_id).await?;
    user.ensure_project_access(&state, current.project_id).await?;

    let affected = state
        .pool
        .interact_with_context(format!("delete deliverable {deliverable_id}"), move |conn| {
            Deliverable::delete(deliverable_id, conn)
        })
        .await?;

    if let Some(file_path) = current.file_path.as_deref() {
        let removed = match ObjectKey::parse(file_path) {
            Ok(key) => state.store.delete(Bucket::ProjectDocuments, &key).await,
            Err(e) => Err(e),
        };
        if let Err(e) = removed {
            tracing::warn!(
                deliverable_id = %deliverable_id,
                file_path = %file_path,
                error = %e,
                "Failed to remove deliverable attachment"
            );
        }
    }

    record_change(
        &state,
        &user,
        Change::new(ChangeTable::Deliverables, ChangeAction::Delete, deliverable_id)
            .in_project(Some(current.project_id)),
    )
    .await;

    Ok(Json(ApiResponse::ok(AffectedRows { affected })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_keys_nest_under_project_and_deliverable() {
        let project_id = Uuid::new_v4();
        let deliverable_id = Uuid::new_v4();

        let key = attachment_key(project_id, deliverable_id, "brief.pdf").unwrap();
        assert_eq!(key.as_str(), format!("{project_id}/{deliverable_id}/brief.pdf"));

        assert!(attachment_key(project_id, deliverable_id, "..").is_err());
        assert!(attachment_key(project_id, deliverable_id, "a/b.pdf").is_err());
    }
}
