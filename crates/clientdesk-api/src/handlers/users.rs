use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use clientdesk_db::{
    DeskPool,
    models::{NewProfile, Profile, ProfileUpdate},
};
use clientdesk_types::{ChangeAction, ChangeTable};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    dto::{ApiResponse, ProfileDTO, UpdateProfileRequest, UpdateRoleRequest},
    errors::{ApiError, DatabaseErrorExt},
    helpers::{Change, record_change},
};

/// Loads the caller's profile, provisioning it from the token claims on first use.
async fn ensure_profile(state: &AppState, user: &AuthUser) -> Result<Profile, ApiError> {
    let new_profile = NewProfile {
        id: user.id,
        email: user.email.clone(),
        full_name: None,
        role: user.role.as_str().to_string(),
    };

    let profile = state
        .pool
        .interact_with_context(format!("find or create profile {}", user.id), move |conn| {
            Profile::find_or_create(new_profile, conn)
        })
        .await?;

    Ok(profile)
}

#[utoipa::path(
    get,
    path = "/v1/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Profile of the caller", body = ApiResponse<ProfileDTO>),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let profile = ensure_profile(&state, &user).await?;
    Ok(Json(ApiResponse::ok(ProfileDTO::from(profile))))
}

#[utoipa::path(
    patch,
    path = "/v1/me",
    tag = "Users",
    request_body = UpdateProfileRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<ProfileDTO>),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let current = ensure_profile(&state, &user).await?;
    let profile_id = current.id;

    let updates = ProfileUpdate {
        full_name: payload.full_name.map(|n| n.trim().to_string()),
        avatar_url: payload.avatar_url,
        role: None,
        updated_at: Some(Utc::now()),
    };

    let profile = state
        .pool
        .interact_with_context(format!("update profile {profile_id}"), move |conn| {
            Profile::update(profile_id, &updates, conn)
        })
        .await?;

    record_change(
        &state,
        &user,
        Change::new(ChangeTable::Profiles, ChangeAction::Update, profile.id),
    )
    .await;

    Ok(Json(ApiResponse::ok(ProfileDTO::from(profile))))
}

#[utoipa::path(
    get,
    path = "/v1/users",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Every profile", body = ApiResponse<Vec<ProfileDTO>>),
        (status = 403, description = "Admins only"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let profiles = state
        .pool
        .interact_with_context("list profiles".to_string(), Profile::find_all)
        .await?;

    let response: Vec<ProfileDTO> = profiles.into_iter().map(ProfileDTO::from).collect();
    Ok(Json(ApiResponse::ok(response)))
}

#[utoipa::path(
    get,
    path = "/v1/users/{user_id}",
    tag = "Users",
    params(("user_id" = Uuid, Path, description = "Profile identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Profile details", body = ApiResponse<ProfileDTO>),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Profile not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state
        .pool
        .interact_with_context(format!("find profile {user_id}"), move |conn| {
            Profile::find_by_id(user_id, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("User {user_id} not found")))?;

    Ok(Json(ApiResponse::ok(ProfileDTO::from(profile))))
}

#[utoipa::path(
    patch,
    path = "/v1/users/{user_id}/role",
    tag = "Users",
    params(("user_id" = Uuid, Path, description = "Profile identifier")),
    request_body = UpdateRoleRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Role changed", body = ApiResponse<ProfileDTO>),
        (status = 400, description = "Admins cannot change their own role"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Profile not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_user_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if user_id == user.id {
        return Err(ApiError::BadRequest(
            "Admins cannot change their own role".to_string(),
        ));
    }

    let updates = ProfileUpdate {
        role: Some(payload.role.as_str().to_string()),
        updated_at: Some(Utc::now()),
        ..Default::default()
    };

    let profile = state
        .pool
        .interact_with_context(format!("change role of {user_id}"), move |conn| {
            Profile::update(user_id, &updates, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("User {user_id} not found")))?;

    tracing::info!(user_id = %user_id, role = %payload.role, changed_by = %user.id, "Role changed");
    record_change(
        &state,
        &user,
        Change::new(ChangeTable::Profiles, ChangeAction::Update, profile.id)
            .with_details(serde_json::json!({ "role": payload.role })),
    )
    .await;

    Ok(Json(ApiResponse::ok(ProfileDTO::from(profile))))
}
