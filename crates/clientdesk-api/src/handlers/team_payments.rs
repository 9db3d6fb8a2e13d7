use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use clientdesk_db::{
    DeskPool,
    models::{NewTeamPayment, TeamPayment, TeamPaymentFilter, TeamPaymentUpdate},
};
use clientdesk_metrics::PaymentLedger;
use clientdesk_types::{ChangeAction, ChangeTable, PaymentStatus};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    dto::{
        AffectedRows, ApiResponse, CreateTeamPaymentRequest, TeamPaymentDTO, TeamPaymentQuery,
        UpdateTeamPaymentRequest,
    },
    errors::{ApiError, DatabaseErrorExt},
    handlers::payments::{ensure_settleable, payment_date_change, reject_paid_status},
    helpers::{Change, ensure_not_blank, parse_amount, parse_optional_amount, record_change},
};

/// Team members only ever see their own payouts.
fn scoped_filter(user: &AuthUser, query: TeamPaymentQuery) -> TeamPaymentFilter {
    let user_id = if user.is_admin() {
        query.user_id
    } else {
        Some(user.id)
    };

    TeamPaymentFilter {
        user_id,
        project_id: query.project_id,
        status: query.status,
    }
}

#[utoipa::path(
    get,
    path = "/v1/team-payments",
    tag = "Team Payments",
    params(TeamPaymentQuery),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Team payouts visible to the caller", body = ApiResponse<Vec<TeamPaymentDTO>>),
        (status = 403, description = "Admins and team members only"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_team_payments(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<TeamPaymentQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = scoped_filter(&user, query);

    let payments = state
        .pool
        .interact_with_context("list team payments".to_string(), move |conn| {
            TeamPayment::find_filtered(&filter, conn)
        })
        .await?;

    let response: Vec<TeamPaymentDTO> = payments.into_iter().map(TeamPaymentDTO::from).collect();
    Ok(Json(ApiResponse::ok(response)))
}

#[utoipa::path(
    get,
    path = "/v1/team-payments/{payment_id}",
    tag = "Team Payments",
    params(("payment_id" = Uuid, Path, description = "Team payment identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Team payout details", body = ApiResponse<TeamPaymentDTO>),
        (status = 403, description = "Payout belongs to someone else"),
        (status = 404, description = "Team payment not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_team_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = state
        .pool
        .interact_with_context(format!("find team payment {payment_id}"), move |conn| {
            TeamPayment::find_by_id(payment_id, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("Team payment {payment_id} not found")))?;

    if !user.is_admin() && payment.user_id != user.id {
        return Err(ApiError::Forbidden(format!(
            "Team payment {payment_id} belongs to another member"
        )));
    }

    Ok(Json(ApiResponse::ok(TeamPaymentDTO::from(payment))))
}

#[utoipa::path(
    post,
    path = "/v1/team-payments",
    tag = "Team Payments",
    request_body = CreateTeamPaymentRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Team payout created", body = ApiResponse<TeamPaymentDTO>),
        (status = 400, description = "Invalid payout payload"),
        (status = 403, description = "Admins only"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_team_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateTeamPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    ensure_not_blank("payment_type", &payload.payment_type)?;

    let status = payload.status.unwrap_or(PaymentStatus::Pending);

    let new_payment = NewTeamPayment {
        project_id: payload.project_id,
        user_id: payload.user_id,
        amount: parse_amount("amount", &payload.amount)?,
        currency: payload.currency.unwrap_or_default().as_str().to_string(),
        status: status.as_str().to_string(),
        payment_type: payload.payment_type,
        payment_date: (status == PaymentStatus::Paid).then(Utc::now),
        due_date: payload.due_date,
        description: payload.description,
    };

    let payment = state
        .pool
        .interact_with_context(
            format!("create team payment for user {}", new_payment.user_id),
            move |conn| TeamPayment::create(&new_payment, conn),
        )
        .await?;

    state
        .metrics
        .payments
        .record_created(PaymentLedger::Team, &payment.currency);
    if status == PaymentStatus::Paid {
        state
            .metrics
            .payments
            .record_settled(PaymentLedger::Team, &payment.currency);
    }

    tracing::info!(
        payment_id = %payment.id,
        user_id = %payment.user_id,
        amount = %payment.amount,
        currency = %payment.currency,
        "Team payment created"
    );
    record_change(
        &state,
        &user,
        Change::new(ChangeTable::TeamPayments, ChangeAction::Insert, payment.id)
            .in_project(payment.project_id)
            .with_details(serde_json::json!({
                "user_id": payment.user_id,
                "amount": payment.amount.to_string(),
                "currency": payment.currency,
            })),
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(TeamPaymentDTO::from(payment))),
    ))
}

#[utoipa::path(
    patch,
    path = "/v1/team-payments/{payment_id}",
    tag = "Team Payments",
    params(("payment_id" = Uuid, Path, description = "Team payment identifier")),
    request_body = UpdateTeamPaymentRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Team payout updated", body = ApiResponse<TeamPaymentDTO>),
        (status = 400, description = "Invalid payout payload"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Team payment not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_team_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(payment_id): Path<Uuid>,
    Json(payload): Json<UpdateTeamPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    reject_paid_status(payload.status)?;

    let updates = TeamPaymentUpdate {
        project_id: payload.project_id,
        amount: parse_optional_amount("amount", payload.amount.as_deref())?,
        currency: payload.currency.map(|c| c.as_str().to_string()),
        status: payload.status.map(|s| s.as_str().to_string()),
        payment_type: payload.payment_type,
        payment_date: payment_date_change(payload.status),
        due_date: payload.due_date,
        description: payload.description,
        updated_at: Some(Utc::now()),
    };

    let payment = state
        .pool
        .interact_with_context(format!("update team payment {payment_id}"), move |conn| {
            TeamPayment::update(payment_id, &updates, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("Team payment {payment_id} not found")))?;

    record_change(
        &state,
        &user,
        Change::new(ChangeTable::TeamPayments, ChangeAction::Update, payment.id)
            .in_project(payment.project_id),
    )
    .await;

    Ok(Json(ApiResponse::ok(TeamPaymentDTO::from(payment))))
}

#[utoipa::path(
    post,
    path = "/v1/team-payments/{payment_id}/mark-paid",
    tag = "Team Payments",
    params(("payment_id" = Uuid, Path, description = "Team payment identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Team payout settled", body = ApiResponse<TeamPaymentDTO>),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Team payment not found"),
        (status = 409, description = "Team payment is already paid or cancelled"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn mark_team_payment_paid(
    State(state): State<AppState>,
    user: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;

    let current = state
        .pool
        .interact_with_context(format!("find team payment {payment_id}"), move |conn| {
            TeamPayment::find_by_id(payment_id, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("Team payment {payment_id} not found")))?;
    ensure_settleable("Team payment", payment_id, &current.status)?;

    let paid_at = Utc::now();
    let payment = state
        .pool
        .interact_with_context(format!("mark team payment {payment_id} paid"), move |conn| {
            TeamPayment::mark_paid(payment_id, paid_at, conn)
        })
        .await
        .map_err(|e| {
            if e.is_not_found() {
                ApiError::Conflict(format!("Team payment {payment_id} was settled concurrently"))
            } else {
                e.into()
            }
        })?;

    state
        .metrics
        .payments
        .record_settled(PaymentLedger::Team, &payment.currency);

    tracing::info!(payment_id = %payment.id, user_id = %payment.user_id, "Team payment marked paid");
    record_change(
        &state,
        &user,
        Change::new(ChangeTable::TeamPayments, ChangeAction::Update, payment.id)
            .in_project(payment.project_id)
            .with_details(serde_json::json!({ "status": PaymentStatus::Paid })),
    )
    .await;

    Ok(Json(ApiResponse::ok(TeamPaymentDTO::from(payment))))
}

#[utoipa::path(
    delete,
    path = "/v1/team-payments/{payment_id}",
    tag = "Team Payments",
    params(("payment_id" = Uuid, Path, description = "Team payment identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Team payout deleted", body = ApiResponse<AffectedRows>),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Team payment not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_team_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;

    let affected = state
        .pool
        .interact_with_context(format!("delete team payment {payment_id}"), move |conn| {
            TeamPayment::delete(payment_id, conn)
        })
        .await?;

    if affected == 0 {
        return Err(ApiError::NotFound(format!(
            "Team payment {payment_id} not found"
        )));
    }

    record_change(
        &state,
        &user,
        Change::new(ChangeTable::TeamPayments, ChangeAction::Delete, payment_id),
    )
    .await;

    Ok(Json(ApiResponse::ok(AffectedRows { affected })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clientdesk_types::UserRole;

    fn user(role: UserRole) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: "member@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn team_members_are_pinned_to_their_own_payouts() {
        let member = user(UserRole::Team);
        let someone_else = Uuid::new_v4();

        let filter = scoped_filter(
            &member,
            TeamPaymentQuery {
                user_id: Some(someone_else),
                project_id: None,
                status: Some(PaymentStatus::Pending),
            },
        );

        assert_eq!(filter.user_id, Some(member.id));
        assert_eq!(filter.status, Some(PaymentStatus::Pending));
    }

    #[test]
    fn admins_filter_freely() {
        let admin = user(UserRole::Admin);
        let filter = scoped_filter(
            &admin,
            TeamPaymentQuery {
                user_id: None,
                project_id: None,
                status: None,
            },
        );
        assert_eq!(filter.user_id, None);
    }
}
