use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use clientdesk_db::{
    DeskPool,
    models::{Client, ClientUpdate, NewClient},
};
use clientdesk_types::{Bucket, ChangeAction, ChangeTable};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    dto::{
        AffectedRows, ApiResponse, ClientDTO, ClientQuery, CreateClientRequest,
        UpdateClientRequest, clamp_limit,
    },
    errors::{ApiError, DatabaseErrorExt},
    helpers::{Change, ensure_not_blank, record_change},
    storage::ObjectKey,
};

#[utoipa::path(
    get,
    path = "/v1/clients",
    tag = "Clients",
    params(ClientQuery),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Clients matching the search term", body = ApiResponse<Vec<ClientDTO>>),
        (status = 403, description = "Staff only"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_clients(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ClientQuery>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_staff()?;

    let limit = clamp_limit(query.limit);
    let search = query.search.filter(|s| !s.trim().is_empty());

    let clients = state
        .pool
        .interact_with_context("search clients".to_string(), move |conn| {
            Client::search(search.as_deref(), limit, conn)
        })
        .await?;

    let response: Vec<ClientDTO> = clients.into_iter().map(ClientDTO::from).collect();
    Ok(Json(ApiResponse::ok(response)))
}

#[utoipa::path(
    get,
    path = "/v1/clients/{client_id}",
    tag = "Clients",
    params(("client_id" = Uuid, Path, description = "Client identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Client details", body = ApiResponse<ClientDTO>),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Client not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_client(
    State(state): State<AppState>,
    user: AuthUser,
    Path(client_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_staff()?;

    let client = state
        .pool
        .interact_with_context(format!("find client {client_id}"), move |conn| {
            Client::find_by_id(client_id, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("Client {client_id} not found")))?;

    Ok(Json(ApiResponse::ok(ClientDTO::from(client))))
}

#[utoipa::path(
    post,
    path = "/v1/clients",
    tag = "Clients",
    request_body = CreateClientRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Client created", body = ApiResponse<ClientDTO>),
        (status = 400, description = "Invalid client payload"),
        (status = 403, description = "Admins only"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_client(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateClientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    ensure_not_blank("name", &payload.name)?;

    let new_client = NewClient {
        name: payload.name.trim().to_string(),
        email: payload.email,
        phone: payload.phone,
        company: payload.company,
        notes: payload.notes,
        created_by: Some(user.id),
    };

    let client = state
        .pool
        .interact_with_context(format!("create client {}", new_client.name), move |conn| {
            Client::create(&new_client, conn)
        })
        .await?;

    tracing::info!(client_id = %client.id, "Client created");
    record_change(
        &state,
        &user,
        Change::new(ChangeTable::Clients, ChangeAction::Insert, client.id),
    )
    .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(ClientDTO::from(client)))))
}

#[utoipa::path(
    patch,
    path = "/v1/clients/{client_id}",
    tag = "Clients",
    params(("client_id" = Uuid, Path, description = "Client identifier")),
    request_body = UpdateClientRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Client updated", body = ApiResponse<ClientDTO>),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Client not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_client(
    State(state): State<AppState>,
    user: AuthUser,
    Path(client_id): Path<Uuid>,
    Json(payload): Json<UpdateClientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    if let Some(name) = payload.name.as_deref() {
        ensure_not_blank("name", name)?;
    }

    let updates = ClientUpdate {
        name: payload.name.map(|n| n.trim().to_string()),
        email: payload.email,
        phone: payload.phone,
        company: payload.company,
        logo_url: None,
        notes: payload.notes,
        updated_at: Some(Utc::now()),
    };

    let client = state
        .pool
        .interact_with_context(format!("update client {client_id}"), move |conn| {
            Client::update(client_id, &updates, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("Client {client_id} not found")))?;

    record_change(
        &state,
        &user,
        Change::new(ChangeTable::Clients, ChangeAction::Update, client.id),
    )
    .await;

    Ok(Json(ApiResponse::ok(ClientDTO::from(client))))
}

#[utoipa::path(
    delete,
    path = "/v1/clients/{client_id}",
    tag = "Clients",
    params(("client_id" = Uuid, Path, description = "Client identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Client and its projects deleted", body = ApiResponse<AffectedRows>),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Client not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_client(
    State(state): State<AppState>,
    user: AuthUser,
    Path(client_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;

    let affected = state
        .pool
        .interact_with_context(format!("delete client {client_id}"), move |conn| {
            Client::delete(client_id, conn)
        })
        .await?;

    if affected == 0 {
        return Err(ApiError::NotFound(format!("Client {client_id} not found")));
    }

    record_change(
        &state,
        &user,
        Change::new(ChangeTable::Clients, ChangeAction::Delete, client_id),
    )
    .await;

    Ok(Json(ApiResponse::ok(AffectedRows { affected })))
}

pub fn logo_key(client_id: Uuid) -> String {
    format!("{client_id}/logo")
}

pub fn logo_url(client_id: Uuid) -> String {
    format!("/v1/storage/{}/{}", Bucket::ClientLogos, logo_key(client_id))
}

#[utoipa::path(
    put,
    path = "/v1/clients/{client_id}/logo",
    tag = "Clients",
    params(("client_id" = Uuid, Path, description = "Client identifier")),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Logo stored and client updated", body = ApiResponse<ClientDTO>),
        (status = 400, description = "Empty upload"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Client not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn upload_client_logo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(client_id): Path<Uuid>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    if body.is_empty() {
        return Err(ApiError::BadRequest("Logo upload is empty".to_string()));
    }

    // Fail before writing the object if the client is unknown.
    state
        .pool
        .interact_with_context(format!("find client {client_id}"), move |conn| {
            Client::find_by_id(client_id, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("Client {client_id} not found")))?;

    let key = ObjectKey::parse(&logo_key(client_id))?;
    let object = state.store.put(Bucket::ClientLogos, &key, &body).await?;

    let url = logo_url(client_id);
    let client = state
        .pool
        .interact_with_context(format!("set logo of client {client_id}"), move |conn| {
            Client::set_logo_url(client_id, &url, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("Client {client_id} not found")))?;

    tracing::info!(client_id = %client_id, size = object.size, "Client logo uploaded");
    record_change(
        &state,
        &user,
        Change::new(ChangeTable::Clients, ChangeAction::Update, client.id)
            .with_details(serde_json::json!({ "logo_url": client.logo_url })),
    )
    .await;

    Ok(Json(ApiResponse::ok(ClientDTO::from(client))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logo_lives_under_the_client_folder() {
        let client_id = Uuid::nil();
        assert_eq!(logo_key(client_id), format!("{client_id}/logo"));
        assert_eq!(
            logo_url(client_id),
            format!("/v1/storage/client-logos/{client_id}/logo")
        );
        assert!(ObjectKey::parse(&logo_key(client_id)).is_ok());
    }
}
