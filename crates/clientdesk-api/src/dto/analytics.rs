use chrono::{DateTime, NaiveDate, Utc};
use clientdesk_analytics::{
    AdminCharts, AdminMetrics, EarningsProjection, MonthlyBucket, OverduePayment, PaymentTotals,
    ProjectProfitability, StatusCount, TeamMemberStats,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// All money fields are decimals rendered as strings for precision.

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentTotalsDTO {
    pub total_paid: String,
    pub total_outstanding: String,
    pub paid_count: usize,
    pub outstanding_count: usize,
    pub total_count: usize,
}

impl From<PaymentTotals> for PaymentTotalsDTO {
    fn from(totals: PaymentTotals) -> Self {
        Self {
            total_paid: totals.total_paid.to_string(),
            total_outstanding: totals.total_outstanding.to_string(),
            paid_count: totals.paid_count,
            outstanding_count: totals.outstanding_count,
            total_count: totals.total_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectProfitabilityDTO {
    pub project_id: Uuid,
    pub project_name: String,
    pub project_status: String,
    pub revenue: String,
    pub team_cost: String,
    pub profit: String,
    pub margin_pct: String,
}

impl From<ProjectProfitability> for ProjectProfitabilityDTO {
    fn from(row: ProjectProfitability) -> Self {
        Self {
            project_id: row.project_id,
            project_name: row.project_name,
            project_status: row.project_status,
            revenue: row.revenue.to_string(),
            team_cost: row.team_cost.to_string(),
            profit: row.profit.to_string(),
            margin_pct: row.margin.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MonthlyBucketDTO {
    pub month: String,
    pub month_start: NaiveDate,
    pub team_costs: String,
    pub client_payments: String,
    pub profit: String,
}

impl From<MonthlyBucket> for MonthlyBucketDTO {
    fn from(bucket: MonthlyBucket) -> Self {
        Self {
            month: bucket.month,
            month_start: bucket.month_start,
            team_costs: bucket.team_costs.to_string(),
            client_payments: bucket.client_payments.to_string(),
            profit: bucket.profit.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamMemberStatsDTO {
    pub user_id: Uuid,
    pub total_paid: String,
    pub average_monthly: String,
    pub last_payment: Option<DateTime<Utc>>,
    pub payment_count: usize,
}

impl From<TeamMemberStats> for TeamMemberStatsDTO {
    fn from(stats: TeamMemberStats) -> Self {
        Self {
            user_id: stats.user_id,
            total_paid: stats.total_paid.to_string(),
            average_monthly: stats.average_monthly.to_string(),
            last_payment: stats.last_payment,
            payment_count: stats.payment_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OverduePaymentDTO {
    pub payment_id: Uuid,
    pub user_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub amount: String,
    pub currency: String,
    pub status: String,
    pub due_date: DateTime<Utc>,
    pub days_past_due: i64,
}

impl From<OverduePayment> for OverduePaymentDTO {
    fn from(payment: OverduePayment) -> Self {
        Self {
            payment_id: payment.payment_id,
            user_id: payment.user_id,
            project_id: payment.project_id,
            amount: payment.amount.to_string(),
            currency: payment.currency,
            status: payment.status,
            due_date: payment.due_date,
            days_past_due: payment.days_past_due,
        }
    }
}

/// Team payment dashboard: totals, profitability, trend, per-member stats and overdue payouts.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamPaymentAnalyticsDTO {
    pub team_totals: PaymentTotalsDTO,
    pub client_totals: PaymentTotalsDTO,
    pub profitability: Vec<ProjectProfitabilityDTO>,
    pub monthly_trend: Vec<MonthlyBucketDTO>,
    pub team_members: Vec<TeamMemberStatsDTO>,
    pub overdue: Vec<OverduePaymentDTO>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EarningsProjectionDTO {
    pub user_id: Uuid,
    pub current_month_earnings: String,
    pub trailing_average: String,
    pub rate_based_estimate: String,
    pub projected_next_month: String,
    pub active_rates: usize,
}

impl From<EarningsProjection> for EarningsProjectionDTO {
    fn from(projection: EarningsProjection) -> Self {
        Self {
            user_id: projection.user_id,
            current_month_earnings: projection.current_month_earnings.to_string(),
            trailing_average: projection.trailing_average.to_string(),
            rate_based_estimate: projection.rate_based_estimate.to_string(),
            projected_next_month: projection.projected_next_month.to_string(),
            active_rates: projection.active_rates,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminMetricsDTO {
    pub total_projects: usize,
    pub active_projects: usize,
    pub total_clients: i64,
    pub team_members: i64,
    pub total_revenue: String,
    pub outstanding_revenue: String,
    pub total_team_costs: String,
    pub net_profit: String,
    pub overdue_deliverables: usize,
    pub upcoming_meetings: usize,
}

impl From<AdminMetrics> for AdminMetricsDTO {
    fn from(metrics: AdminMetrics) -> Self {
        Self {
            total_projects: metrics.total_projects,
            active_projects: metrics.active_projects,
            total_clients: metrics.total_clients,
            team_members: metrics.team_members,
            total_revenue: metrics.total_revenue.to_string(),
            outstanding_revenue: metrics.outstanding_revenue.to_string(),
            total_team_costs: metrics.total_team_costs.to_string(),
            net_profit: metrics.net_profit.to_string(),
            overdue_deliverables: metrics.overdue_deliverables,
            upcoming_meetings: metrics.upcoming_meetings,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusCountDTO {
    pub status: String,
    pub count: usize,
}

impl From<StatusCount> for StatusCountDTO {
    fn from(count: StatusCount) -> Self {
        Self {
            status: count.status.to_string(),
            count: count.count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminChartsDTO {
    pub revenue_trend: Vec<MonthlyBucketDTO>,
    pub project_status: Vec<StatusCountDTO>,
    pub payment_status: Vec<StatusCountDTO>,
    pub deliverable_status: Vec<StatusCountDTO>,
}

impl From<AdminCharts> for AdminChartsDTO {
    fn from(charts: AdminCharts) -> Self {
        Self {
            revenue_trend: charts.revenue_trend.into_iter().map(Into::into).collect(),
            project_status: charts.project_status.into_iter().map(Into::into).collect(),
            payment_status: charts.payment_status.into_iter().map(Into::into).collect(),
            deliverable_status: charts
                .deliverable_status
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}
