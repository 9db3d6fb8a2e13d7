use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use clientdesk_db::{
    DeskPool,
    models::{NewTeamPaymentRate, TeamPaymentRate, TeamPaymentRateUpdate},
};
use clientdesk_types::{ChangeAction, ChangeTable};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    dto::{AffectedRows, ApiResponse, CreateRateRequest, RateDTO, RateQuery, UpdateRateRequest},
    errors::{ApiError, DatabaseErrorExt},
    helpers::{Change, parse_amount, parse_optional_amount, record_change},
};

#[utoipa::path(
    get,
    path = "/v1/rates",
    tag = "Rates",
    params(RateQuery),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Payment rates", body = ApiResponse<Vec<RateDTO>>),
        (status = 403, description = "Admins only"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_rates(
    State(state): State<AppState>,
    Query(query): Query<RateQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rates = state
        .pool
        .interact_with_context("list payment rates".to_string(), move |conn| {
            match query.user_id {
                Some(user_id) => TeamPaymentRate::find_by_user(user_id, conn),
                None => TeamPaymentRate::find_all(conn),
            }
        })
        .await?;

    let response: Vec<RateDTO> = rates.into_iter().map(RateDTO::from).collect();
    Ok(Json(ApiResponse::ok(response)))
}

#[utoipa::path(
    post,
    path = "/v1/rates",
    tag = "Rates",
    request_body = CreateRateRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Rate created", body = ApiResponse<RateDTO>),
        (status = 400, description = "Invalid rate payload"),
        (status = 403, description = "Admins only"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_rate(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateRateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new_rate = NewTeamPaymentRate {
        user_id: payload.user_id,
        project_id: payload.project_id,
        rate_type: payload.rate_type.as_str().to_string(),
        rate_amount: parse_amount("rate_amount", &payload.rate_amount)?,
        currency: payload.currency.unwrap_or_default().as_str().to_string(),
        is_active: true,
    };

    let rate = state
        .pool
        .interact_with_context(
            format!("create {} rate for user {}", new_rate.rate_type, new_rate.user_id),
            move |conn| TeamPaymentRate::create(&new_rate, conn),
        )
        .await?;

    tracing::info!(
        rate_id = %rate.id,
        user_id = %rate.user_id,
        rate_type = %rate.rate_type,
        rate_amount = %rate.rate_amount,
        "Payment rate created"
    );
    record_change(
        &state,
        &user,
        Change::new(ChangeTable::TeamPaymentRates, ChangeAction::Insert, rate.id)
            .in_project(rate.project_id),
    )
    .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(RateDTO::from(rate)))))
}

#[utoipa::path(
    patch,
    path = "/v1/rates/{rate_id}",
    tag = "Rates",
    params(("rate_id" = Uuid, Path, description = "Rate identifier")),
    request_body = UpdateRateRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Rate updated", body = ApiResponse<RateDTO>),
        (status = 400, description = "Invalid rate payload"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Rate not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_rate(
    State(state): State<AppState>,
    user: AuthUser,
    Path(rate_id): Path<Uuid>,
    Json(payload): Json<UpdateRateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let updates = TeamPaymentRateUpdate {
        project_id: payload.project_id,
        rate_type: payload.rate_type.map(|t| t.as_str().to_string()),
        rate_amount: parse_optional_amount("rate_amount", payload.rate_amount.as_deref())?,
        currency: payload.currency.map(|c| c.as_str().to_string()),
        is_active: payload.is_active,
        updated_at: Some(Utc::now()),
    };

    let rate = state
        .pool
        .interact_with_context(format!("update rate {rate_id}"), move |conn| {
            TeamPaymentRate::update(rate_id, &updates, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("Rate {rate_id} not found")))?;

    record_change(
        &state,
        &user,
        Change::new(ChangeTable::TeamPaymentRates, ChangeAction::Update, rate.id)
            .in_project(rate.project_id),
    )
    .await;

    Ok(Json(ApiResponse::ok(RateDTO::from(rate))))
}

#[utoipa::path(
    post,
    path = "/v1/rates/{rate_id}/deactivate",
    tag = "Rates",
    params(("rate_id" = Uuid, Path, description = "Rate identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Rate no longer counts towards projections", body = ApiResponse<RateDTO>),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Rate not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn deactivate_rate(
    State(state): State<AppState>,
    user: AuthUser,
    Path(rate_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let rate = state
        .pool
        .interact_with_context(format!("deactivate rate {rate_id}"), move |conn| {
            TeamPaymentRate::deactivate(rate_id, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("Rate {rate_id} not found")))?;

    tracing::info!(rate_id = %rate.id, user_id = %rate.user_id, "Payment rate deactivated");
    record_change(
        &state,
        &user,
        Change::new(ChangeTable::TeamPaymentRates, ChangeAction::Update, rate.id)
            .in_project(rate.project_id)
            .with_details(serde_json::json!({ "is_active": false })),
    )
    .await;

    Ok(Json(ApiResponse::ok(RateDTO::from(rate))))
}

#[utoipa::path(
    delete,
    path = "/v1/rates/{rate_id}",
    tag = "Rates",
    params(("rate_id" = Uuid, Path, description = "Rate identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Rate deleted", body = ApiResponse<AffectedRows>),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Rate not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_rate(
    State(state): State<AppState>,
    user: AuthUser,
    Path(rate_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let affected = state
        .pool
        .interact_with_context(format!("delete rate {rate_id}"), move |conn| {
            TeamPaymentRate::delete(rate_id, conn)
        })
        .await?;

    if affected == 0 {
        return Err(ApiError::NotFound(format!("Rate {rate_id} not found")));
    }

    record_change(
        &state,
        &user,
        Change::new(ChangeTable::TeamPaymentRates, ChangeAction::Delete, rate_id),
    )
    .await;

    Ok(Json(ApiResponse::ok(AffectedRows { affected })))
}
