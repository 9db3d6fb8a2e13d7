use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use chrono::Utc;
use clientdesk_analytics::{
    AdminSnapshot, compute_admin_charts, compute_admin_metrics, compute_earnings_projection,
    compute_monthly_trend, compute_overdue, compute_project_profitability,
    compute_team_member_stats, compute_totals,
};
use clientdesk_db::{
    DeskPool,
    models::{
        Client, Deliverable, Meeting, Payment, Profile, Project, TeamPayment, TeamPaymentRate,
    },
};
use clientdesk_types::UserRole;
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    dto::{
        AdminChartsDTO, AdminMetricsDTO, ApiResponse, EarningsProjectionDTO, MonthlyBucketDTO,
        OverduePaymentDTO, PaymentTotalsDTO, ProjectProfitabilityDTO, TeamMemberStatsDTO,
        TeamPaymentAnalyticsDTO, TrendQuery,
    },
    errors::ApiError,
};

const MAX_MONTHS_BACK: u32 = 36;

#[utoipa::path(
    get,
    path = "/v1/analytics/team-payments",
    tag = "Analytics",
    params(TrendQuery),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Totals, profitability, monthly trend, member stats and overdue payouts", body = ApiResponse<TeamPaymentAnalyticsDTO>),
        (status = 403, description = "Admins only"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_team_payment_analytics(
    State(state): State<AppState>,
    Query(query): Query<TrendQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let months_back = query.months_back.clamp(1, MAX_MONTHS_BACK);

    let (team_result, client_result, projects_result) = tokio::join!(
        state
            .pool
            .interact_with_context("load team payments".to_string(), TeamPayment::find_all),
        state
            .pool
            .interact_with_context("load client payments".to_string(), Payment::find_all),
        state
            .pool
            .interact_with_context("load projects".to_string(), Project::find_all),
    );
    let team_payments = team_result?;
    let client_payments = client_result?;
    let projects = projects_result?;

    let now = Utc::now();
    let response = TeamPaymentAnalyticsDTO {
        team_totals: PaymentTotalsDTO::from(compute_totals(&team_payments)),
        client_totals: PaymentTotalsDTO::from(compute_totals(&client_payments)),
        profitability: compute_project_profitability(&projects, &team_payments, &client_payments)
            .into_iter()
            .map(ProjectProfitabilityDTO::from)
            .collect(),
        monthly_trend: compute_monthly_trend(&team_payments, &client_payments, months_back, now)
            .into_iter()
            .map(MonthlyBucketDTO::from)
            .collect(),
        team_members: compute_team_member_stats(&team_payments)
            .into_iter()
            .map(TeamMemberStatsDTO::from)
            .collect(),
        overdue: compute_overdue(&team_payments, now)
            .into_iter()
            .map(OverduePaymentDTO::from)
            .collect(),
    };

    tracing::debug!(
        team_payments = team_payments.len(),
        client_payments = client_payments.len(),
        projects = projects.len(),
        months_back,
        "Computed team payment analytics"
    );

    Ok(Json(ApiResponse::ok(response)))
}

async fn load_admin_snapshot(state: &AppState) -> Result<AdminSnapshot, ApiError> {
    let (projects, clients, team, payments, team_payments, deliverables, meetings) = tokio::join!(
        state
            .pool
            .interact_with_context("load projects".to_string(), Project::find_all),
        state
            .pool
            .interact_with_context("count clients".to_string(), Client::count),
        state
            .pool
            .interact_with_context("count team members".to_string(), |conn| {
                Profile::count_by_role(UserRole::Team, conn)
            }),
        state
            .pool
            .interact_with_context("load client payments".to_string(), Payment::find_all),
        state
            .pool
            .interact_with_context("load team payments".to_string(), TeamPayment::find_all),
        state
            .pool
            .interact_with_context("load deliverables".to_string(), Deliverable::find_all),
        state
            .pool
            .interact_with_context("load meetings".to_string(), Meeting::find_all),
    );

    Ok(AdminSnapshot {
        projects: projects?,
        client_count: clients?,
        team_member_count: team?,
        payments: payments?,
        team_payments: team_payments?,
        deliverables: deliverables?,
        meetings: meetings?,
    })
}

#[utoipa::path(
    get,
    path = "/v1/analytics/admin/metrics",
    tag = "Analytics",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Headline numbers of the admin dashboard", body = ApiResponse<AdminMetricsDTO>),
        (status = 403, description = "Admins only"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_admin_metrics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let snapshot = load_admin_snapshot(&state).await?;
    let metrics = compute_admin_metrics(&snapshot, Utc::now());

    Ok(Json(ApiResponse::ok(AdminMetricsDTO::from(metrics))))
}

#[utoipa::path(
    get,
    path = "/v1/analytics/admin/charts",
    tag = "Analytics",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Revenue trend and status distributions", body = ApiResponse<AdminChartsDTO>),
        (status = 403, description = "Admins only"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_admin_charts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let snapshot = load_admin_snapshot(&state).await?;
    let charts = compute_admin_charts(&snapshot, Utc::now());

    Ok(Json(ApiResponse::ok(AdminChartsDTO::from(charts))))
}

async fn projection_for(state: &AppState, user_id: Uuid) -> Result<EarningsProjectionDTO, ApiError> {
    let (payments_result, rates_result) = tokio::join!(
        state
            .pool
            .interact_with_context(format!("load team payments of {user_id}"), move |conn| {
                TeamPayment::find_by_user(user_id, conn)
            }),
        state
            .pool
            .interact_with_context(format!("load rates of {user_id}"), move |conn| {
                TeamPaymentRate::find_by_user(user_id, conn)
            }),
    );
    let payments = payments_result?;
    let rates = rates_result?;

    let projection = compute_earnings_projection(user_id, &payments, &rates, Utc::now());
    Ok(EarningsProjectionDTO::from(projection))
}

#[utoipa::path(
    get,
    path = "/v1/analytics/projection/{user_id}",
    tag = "Analytics",
    params(("user_id" = Uuid, Path, description = "Team member identifier")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Next month earnings projection of a team member", body = ApiResponse<EarningsProjectionDTO>),
        (status = 403, description = "Admins only"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_member_projection(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let projection = projection_for(&state, user_id).await?;
    Ok(Json(ApiResponse::ok(projection)))
}

#[utoipa::path(
    get,
    path = "/v1/me/projection",
    tag = "Analytics",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Next month earnings projection of the caller", body = ApiResponse<EarningsProjectionDTO>),
        (status = 403, description = "Admins and team members only"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_my_projection(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    user.require_staff()?;
    let projection = projection_for(&state, user.id).await?;
    Ok(Json(ApiResponse::ok(projection)))
}
