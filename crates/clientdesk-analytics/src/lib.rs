pub mod admin;
pub mod calendar;
pub mod overdue;
pub mod profitability;
pub mod projection;
pub mod record;
pub mod service;
pub mod task;
pub mod team;
pub mod totals;
pub mod trend;

#[cfg(test)]
mod fixtures;

pub use admin::{
    AdminCharts, AdminMetrics, AdminSnapshot, StatusCount, compute_admin_charts,
    compute_admin_metrics,
};
pub use overdue::{OverduePayment, compute_overdue};
pub use profitability::{ProjectProfitability, compute_project_profitability};
pub use projection::{
    EarningsProjection, HOURS_PER_MONTH, TRAILING_MONTHS, compute_earnings_projection,
    project_next_month, rate_based_estimate, trailing_monthly_average,
};
pub use record::PaymentRecord;
pub use service::{ChangeSink, OverdueScanService};
pub use task::OverdueScanTask;
pub use team::{TeamMemberStats, compute_team_member_stats};
pub use totals::{PaymentTotals, compute_totals};
pub use trend::{DEFAULT_MONTHS_BACK, MonthlyBucket, compute_monthly_trend};
