use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use clientdesk_types::Bucket;
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    dto::{AffectedRows, ApiResponse, StorageListQuery},
    errors::ApiError,
    storage::{ObjectInfo, ObjectKey},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Read,
    Write,
}

/// Project documents are keyed `<project_id>/...`.
fn project_of(key: &str) -> Result<Uuid, ApiError> {
    key.split('/')
        .next()
        .and_then(|segment| Uuid::parse_str(segment).ok())
        .ok_or_else(|| {
            ApiError::BadRequest(format!(
                "Keys in {} must start with a project id",
                Bucket::ProjectDocuments
            ))
        })
}

async fn authorize(
    state: &AppState,
    user: &AuthUser,
    bucket: Bucket,
    key: &str,
    access: Access,
) -> Result<(), ApiError> {
    match (bucket, access) {
        (Bucket::ClientLogos, Access::Read) => Ok(()),
        (Bucket::ClientLogos, Access::Write) => user.require_admin(),
        (Bucket::ProjectDocuments, access) => {
            if access == Access::Write {
                user.require_staff()?;
            }
            user.ensure_project_access(state, project_of(key)?).await
        }
    }
}

#[utoipa::path(
    put,
    path = "/v1/storage/{bucket}/{key}",
    tag = "Storage",
    params(
        ("bucket" = Bucket, Path, description = "Storage bucket"),
        ("key" = String, Path, description = "Relative object key, may contain '/'")
    ),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Object stored", body = ApiResponse<ObjectInfo>),
        (status = 400, description = "Invalid object key"),
        (status = 403, description = "Caller may not write here"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn put_object(
    State(state): State<AppState>,
    user: AuthUser,
    Path((bucket, key)): Path<(Bucket, String)>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let key = ObjectKey::parse(&key)?;
    authorize(&state, &user, bucket, key.as_str(), Access::Write).await?;

    let object = state.store.put(bucket, &key, &body).await?;
    tracing::info!(%bucket, key = %object.key, size = object.size, "Object uploaded");

    Ok(Json(ApiResponse::ok(object)))
}

#[utoipa::path(
    get,
    path = "/v1/storage/{bucket}/{key}",
    tag = "Storage",
    params(
        ("bucket" = Bucket, Path, description = "Storage bucket"),
        ("key" = String, Path, description = "Relative object key, may contain '/'")
    ),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Object bytes", content_type = "application/octet-stream"),
        (status = 403, description = "Caller may not read here"),
        (status = 404, description = "Object not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_object(
    State(state): State<AppState>,
    user: AuthUser,
    Path((bucket, key)): Path<(Bucket, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let key = ObjectKey::parse(&key)?;
    authorize(&state, &user, bucket, key.as_str(), Access::Read).await?;

    let bytes = state.store.get(bucket, &key).await?;
    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], bytes))
}

#[utoipa::path(
    delete,
    path = "/v1/storage/{bucket}/{key}",
    tag = "Storage",
    params(
        ("bucket" = Bucket, Path, description = "Storage bucket"),
        ("key" = String, Path, description = "Relative object key, may contain '/'")
    ),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Object removed", body = ApiResponse<AffectedRows>),
        (status = 403, description = "Caller may not write here"),
        (status = 404, description = "Object not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_object(
    State(state): State<AppState>,
    user: AuthUser,
    Path((bucket, key)): Path<(Bucket, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let key = ObjectKey::parse(&key)?;
    authorize(&state, &user, bucket, key.as_str(), Access::Write).await?;

    state.store.delete(bucket, &key).await?;
    tracing::info!(%bucket, key = key.as_str(), "Object deleted");

    Ok(Json(ApiResponse::ok(AffectedRows { affected: 1 })))
}

#[utoipa::path(
    get,
    path = "/v1/storage/{bucket}",
    tag = "Storage",
    params(
        ("bucket" = Bucket, Path, description = "Storage bucket"),
        StorageListQuery
    ),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Objects under the prefix", body = ApiResponse<Vec<ObjectInfo>>),
        (status = 400, description = "Non-admins must list project documents by project prefix"),
        (status = 403, description = "Caller may not read here"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_objects(
    State(state): State<AppState>,
    user: AuthUser,
    Path(bucket): Path<Bucket>,
    Query(query): Query<StorageListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let prefix = query.prefix.filter(|p| !p.is_empty());

    match prefix.as_deref() {
        Some(prefix) => authorize(&state, &user, bucket, prefix, Access::Read).await?,
        None if bucket == Bucket::ProjectDocuments => user.require_admin()?,
        None => {}
    }

    let objects = state.store.list(bucket, prefix.as_deref()).await?;
    Ok(Json(ApiResponse::ok(objects)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_documents_are_scoped_by_leading_project_id() {
        let project_id = Uuid::new_v4();
        assert_eq!(
            project_of(&format!("{project_id}/brief.pdf")).unwrap(),
            project_id
        );
        assert_eq!(project_of(&project_id.to_string()).unwrap(), project_id);
        assert!(matches!(
            project_of("shared/brief.pdf"),
            Err(ApiError::BadRequest(_))
        ));
    }
}
