use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use clientdesk_db::{
    DeskPool,
    models::{NewPayment, Payment, PaymentFilter, PaymentUpdate},
};
use clientdesk_metrics::PaymentLedger;
use clientdesk_types::{ChangeAction, ChangeTable, PaymentStatus};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    dto::{
        AffectedRows, ApiResponse, CreatePaymentRequest, PaymentDTO, PaymentQuery,
        UpdatePaymentRequest,
    },
    errors::{ApiError, DatabaseErrorExt},
    helpers::{Change, ensure_not_blank, parse_amount, parse_optional_amount, record_change},
};

pub(crate) fn reject_paid_status(status: Option<PaymentStatus>) -> Result<(), ApiError> {
    if status == Some(PaymentStatus::Paid) {
        return Err(ApiError::BadRequest(
            "Use the mark-paid endpoint to settle a payment".to_string(),
        ));
    }
    Ok(())
}

/// Only outstanding payments can be settled. `label` names the ledger in the error.
pub(crate) fn ensure_settleable(
    label: &str,
    payment_id: Uuid,
    status: &str,
) -> Result<(), ApiError> {
    match status.parse::<PaymentStatus>() {
        Ok(current) if current.is_outstanding() => Ok(()),
        _ => Err(ApiError::Conflict(format!(
            "{label} {payment_id} is {status} and cannot be marked paid"
        ))),
    }
}

/// A status change that leaves `paid` also drops the settlement date.
pub(crate) fn payment_date_change(
    status: Option<PaymentStatus>,
) -> Option<Option<DateTime<Utc>>> {
    status.filter(|s| !s.carries_payment_date()).map(|_| None)
}

#[utoipa::path(
    get,
    path = "/v1/payments",
    tag = "Payments",
    params(PaymentQuery),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Client payments visible to the caller", body = ApiResponse<Vec<PaymentDTO>>),
        (status = 403, description = "Caller is not assigned to the project"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_payments(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<PaymentQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(project_id) = query.project_id {
        user.ensure_project_access(&state, project_id).await?;
    }

    let filter = PaymentFilter {
        project_id: query.project_id,
        project_ids: user.visible_projects(&state).await?,
        status: query.status,
    };

    let payments = state
        .pool
        .interact_with_context("list client payments".to_string(), move |conn| {
            Payment::find_filtered(&filter, conn)
        })
        .await?;

    let response: Vec<PaymentDTO> = payments.into_iter().map(PaymentDTO::from).collect();
    Ok(Json(ApiResponse::ok(response)))
}

#[utoipa::path(
    get,
    path = "/v1/payments/{payment_id}",
    tag = "Payments",
    params(("payment_id" = Uuid, Path, description = "Payment identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Payment details", body = ApiResponse<PaymentDTO>),
        (status = 403, description = "Caller is not assigned to the project"),
        (status = 404, description = "Payment not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = state
        .pool
        .interact_with_context(format!("find payment {payment_id}"), move |conn| {
            Payment::find_by_id(payment_id, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("Payment {payment_id} not found")))?;

    user.ensure_project_access(&state, payment.project_id).await?;

    Ok(Json(ApiResponse::ok(PaymentDTO::from(payment))))
}

#[utoipa::path(
    post,
    path = "/v1/payments",
    tag = "Payments",
    request_body = CreatePaymentRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Payment created", body = ApiResponse<PaymentDTO>),
        (status = 400, description = "Invalid payment payload"),
        (status = 403, description = "Admins only"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    ensure_not_blank("payment_type", &payload.payment_type)?;

    let status = payload.status.unwrap_or(PaymentStatus::Pending);
    let now = Utc::now();

    let new_payment = NewPayment {
        project_id: payload.project_id,
        user_id: payload.user_id,
        amount: parse_amount("amount", &payload.amount)?,
        currency: payload.currency.unwrap_or_default().as_str().to_string(),
        status: status.as_str().to_string(),
        payment_type: payload.payment_type,
        // Only settled payments carry a payment date.
        payment_date: (status == PaymentStatus::Paid).then_some(now),
        due_date: payload.due_date,
        description: payload.description,
    };

    let payment = state
        .pool
        .interact_with_context(
            format!("create payment for project {}", new_payment.project_id),
            move |conn| Payment::create(&new_payment, conn),
        )
        .await?;

    state
        .metrics
        .payments
        .record_created(PaymentLedger::Client, &payment.currency);
    if status == PaymentStatus::Paid {
        state
            .metrics
            .payments
            .record_settled(PaymentLedger::Client, &payment.currency);
    }

    tracing::info!(
        payment_id = %payment.id,
        project_id = %payment.project_id,
        amount = %payment.amount,
        currency = %payment.currency,
        "Client payment created"
    );
    record_change(
        &state,
        &user,
        Change::new(ChangeTable::Payments, ChangeAction::Insert, payment.id)
            .in_project(Some(payment.project_id))
            .with_details(serde_json::json!({
                "amount": payment.amount.to_string(),
                "currency": payment.currency,
            })),
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(PaymentDTO::from(payment))),
    ))
}

#[utoipa::path(
    patch,
    path = "/v1/payments/{payment_id}",
    tag = "Payments",
    params(("payment_id" = Uuid, Path, description = "Payment identifier")),
    request_body = UpdatePaymentRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Payment updated", body = ApiResponse<PaymentDTO>),
        (status = 400, description = "Invalid payment payload"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Payment not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(payment_id): Path<Uuid>,
    Json(payload): Json<UpdatePaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;
    reject_paid_status(payload.status)?;

    let updates = PaymentUpdate {
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
        .interact_with_context(format!("update payment {payment_id}"), move |conn| {
            Payment::update(payment_id, &updates, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("Payment {payment_id} not found")))?;

    record_change(
        &state,
        &user,
        Change::new(ChangeTable::Payments, ChangeAction::Update, payment.id)
            .in_project(Some(payment.project_id)),
    )
    .await;

    Ok(Json(ApiResponse::ok(PaymentDTO::from(payment))))
}

#[utoipa::path(
    post,
    path = "/v1/payments/{payment_id}/mark-paid",
    tag = "Payments",
    params(("payment_id" = Uuid, Path, description = "Payment identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Payment settled", body = ApiResponse<PaymentDTO>),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Payment not found"),
        (status = 409, description = "Payment is already paid or cancelled"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn mark_payment_paid(
    State(state): State<AppState>,
    user: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;

    let current = state
        .pool
        .interact_with_context(format!("find payment {payment_id}"), move |conn| {
            Payment::find_by_id(payment_id, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("Payment {payment_id} not found")))?;
    ensure_settleable("Payment", payment_id, &current.status)?;

    let paid_at = Utc::now();
    let payment = state
        .pool
        .interact_with_context(format!("mark payment {payment_id} paid"), move |conn| {
            Payment::mark_paid(payment_id, paid_at, conn)
        })
        .await
        .map_err(|e| {
            if e.is_not_found() {
                ApiError::Conflict(format!("Payment {payment_id} was settled concurrently"))
            } else {
                e.into()
            }
        })?;

    state
        .metrics
        .payments
        .record_settled(PaymentLedger::Client, &payment.currency);

    tracing::info!(payment_id = %payment.id, "Client payment marked paid");
    record_change(
        &state,
        &user,
        Change::new(ChangeTable::Payments, ChangeAction::Update, payment.id)
            .in_project(Some(payment.project_id))
            .with_details(serde_json::json!({ "status": PaymentStatus::Paid })),
    )
    .await;

    Ok(Json(ApiResponse::ok(PaymentDTO::from(payment))))
}

#[utoipa::path(
    delete,
    path = "/v1/payments/{payment_id}",
    tag = "Payments",
    params(("payment_id" = Uuid, Path, description = "Payment identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Payment deleted", body = ApiResponse<AffectedRows>),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Payment not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_admin()?;

    let payment = state
        .pool
        .interact_with_context(format!("find payment {payment_id}"), move |conn| {
            Payment::find_by_id(payment_id, conn)
        })
        .await
        .map_err(|e| e.or_not_found(format!("Payment {payment_id} not found")))?;

    let affected = state
        .pool
        .interact_with_context(format!("delete payment {payment_id}"), move |conn| {
            Payment::delete(payment_id, conn)
        })
        .await?;

    record_change(
        &state,
        &user,
        Change::new(ChangeTable::Payments, ChangeAction::Delete, payment_id)
            .in_project(Some(payment.project_id)),
    )
    .await;

    Ok(Json(ApiResponse::ok(AffectedRows { affected })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settling_through_update_is_rejected() {
        assert!(reject_paid_status(Some(PaymentStatus::Paid)).is_err());
        assert!(reject_paid_status(Some(PaymentStatus::Approved)).is_ok());
        assert!(reject_paid_status(None).is_ok());
    }

    #[test]
    fn only_outstanding_payments_can_be_settled() {
        let id = Uuid::new_v4();
        assert!(ensure_settleable("Payment", id, "pending").is_ok());
        assert!(ensure_settleable("Payment", id, "approved").is_ok());
        assert!(matches!(
            ensure_settleable("Payment", id, "paid"),
            Err(ApiError::Conflict(_))
        ));
        assert!(matches!(
            ensure_settleable("Payment", id, "cancelled"),
            Err(ApiError::Conflict(_))
        ));
        assert!(ensure_settleable("Payment", id, "refunded").is_err());
    }

    #[test]
    fn leaving_paid_clears_the_payment_date() {
        assert_eq!(payment_date_change(None), None);
        assert_eq!(payment_date_change(Some(PaymentStatus::Pending)), Some(None));
        assert_eq!(payment_date_change(Some(PaymentStatus::Cancelled)), Some(None));
        assert_eq!(payment_date_change(Some(PaymentStatus::Paid)), None);
    }
}
