use chrono::{DateTime, Duration, Utc};
use clientdesk_db::models::{Deliverable, Meeting, Payment, Project, TeamPayment};
use clientdesk_types::{DeliverableStatus, MeetingStatus, PaymentStatus, ProjectStatus};
use rust_decimal::Decimal;
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::totals::compute_totals;
use crate::trend::{DEFAULT_MONTHS_BACK, MonthlyBucket, compute_monthly_trend};

pub const UPCOMING_MEETINGS_WINDOW_DAYS: i64 = 7;

/// Everything the admin dashboard aggregates, fetched in one pass.
#[derive(Debug, Clone, Default)]
pub struct AdminSnapshot {
    pub projects: Vec<Project>,
    pub client_count: i64,
    pub team_member_count: i64,
    pub payments: Vec<Payment>,
    pub team_payments: Vec<TeamPayment>,
    pub deliverables: Vec<Deliverable>,
    pub meetings: Vec<Meeting>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdminMetrics {
    pub total_projects: usize,
    pub active_projects: usize,
    pub total_clients: i64,
    pub team_members: i64,
    pub total_revenue: Decimal,
    pub outstanding_revenue: Decimal,
    pub total_team_costs: Decimal,
    pub net_profit: Decimal,
    pub overdue_deliverables: usize,
    pub upcoming_meetings: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminCharts {
    pub revenue_trend: Vec<MonthlyBucket>,
    pub project_status: Vec<StatusCount>,
    pub payment_status: Vec<StatusCount>,
    pub deliverable_status: Vec<StatusCount>,
}

pub fn compute_admin_metrics(snapshot: &AdminSnapshot, now: DateTime<Utc>) -> AdminMetrics {
    let today = now.date_naive();
    let revenue = compute_totals(&snapshot.payments);
    let costs = compute_totals(&snapshot.team_payments);
    let meetings_until = now + Duration::days(UPCOMING_MEETINGS_WINDOW_DAYS);

    AdminMetrics {
        total_projects: snapshot.projects.len(),
        active_projects: snapshot
            .projects
            .iter()
            .filter(|p| p.status == ProjectStatus::Active.as_str())
            .count(),
        total_clients: snapshot.client_count,
        team_members: snapshot.team_member_count,
        total_revenue: revenue.total_paid,
        outstanding_revenue: revenue.total_outstanding,
        total_team_costs: costs.total_paid,
        net_profit: revenue.total_paid - costs.total_paid,
        overdue_deliverables: snapshot
            .deliverables
            .iter()
            .filter(|d| d.is_overdue(today))
            .count(),
        upcoming_meetings: snapshot
            .meetings
            .iter()
            .filter(|m| m.status == MeetingStatus::Scheduled.as_str())
            .filter(|m| m.scheduled_at >= now && m.scheduled_at < meetings_until)
            .count(),
    }
}

/// Counts per variant in declaration order. Unknown values are dropped.
fn distribution<'a, E>(values: impl Iterator<Item = &'a str>) -> Vec<StatusCount>
where
    E: IntoEnumIterator + Copy,
    &'static str: From<E>,
{
    let values: Vec<&str> = values.collect();
    E::iter()
        .map(|variant| {
            let status: &'static str = variant.into();
            StatusCount {
                status,
                count: values.iter().filter(|v| **v == status).count(),
            }
        })
        .collect()
}

pub fn compute_admin_charts(snapshot: &AdminSnapshot, now: DateTime<Utc>) -> AdminCharts {
    AdminCharts {
        revenue_trend: compute_monthly_trend(
            &snapshot.team_payments,
            &snapshot.payments,
            DEFAULT_MONTHS_BACK,
            now,
        ),
        project_status: distribution::<ProjectStatus>(
            snapshot.projects.iter().map(|p| p.status.as_str()),
        ),
        payment_status: distribution::<PaymentStatus>(
            snapshot.payments.iter().map(|p| p.status.as_str()),
        ),
        deliverable_status: distribution::<DeliverableStatus>(
            snapshot.deliverables.iter().map(|d| d.status.as_str()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{at, client_payment, project, team_payment};
    use chrono::NaiveDate;
    use rust_decimal::dec;
    use uuid::Uuid;

    fn deliverable(status: DeliverableStatus, due: Option<NaiveDate>) -> Deliverable {
        Deliverable {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            title: "Brand book".to_string(),
            description: None,
            status: status.as_str().to_string(),
            due_date: due,
            file_path: None,
            created_at: at(2026, 1, 1),
            updated_at: at(2026, 1, 1),
        }
    }

    fn meeting(status: MeetingStatus, scheduled_at: DateTime<Utc>) -> Meeting {
        Meeting {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            title: "Kickoff".to_string(),
            description: None,
            scheduled_at,
            duration_minutes: 30,
            meeting_url: None,
            status: status.as_str().to_string(),
            created_by: None,
            created_at: at(2026, 1, 1),
            updated_at: at(2026, 1, 1),
        }
    }

    fn snapshot() -> AdminSnapshot {
        let active = project("Active", ProjectStatus::Active);
        let held = project("Held", ProjectStatus::OnHold);
        let member = Uuid::new_v4();

        AdminSnapshot {
            payments: vec![
                client_payment(active.id, dec!(5000), PaymentStatus::Paid, at(2026, 5, 2)),
                client_payment(active.id, dec!(1500), PaymentStatus::Pending, at(2026, 5, 3)),
                client_payment(held.id, dec!(700), PaymentStatus::Cancelled, at(2026, 5, 4)),
            ],
            team_payments: vec![
                team_payment(member, dec!(2000), PaymentStatus::Paid, at(2026, 5, 5)),
                team_payment(member, dec!(400), PaymentStatus::Approved, at(2026, 5, 6)),
            ],
            deliverables: vec![
                deliverable(DeliverableStatus::InProgress, NaiveDate::from_ymd_opt(2026, 5, 1)),
                deliverable(DeliverableStatus::Completed, NaiveDate::from_ymd_opt(2026, 5, 1)),
                deliverable(DeliverableStatus::Review, None),
            ],
            meetings: vec![
                meeting(MeetingStatus::Scheduled, at(2026, 5, 12)),
                meeting(MeetingStatus::Scheduled, at(2026, 5, 30)),
                meeting(MeetingStatus::Cancelled, at(2026, 5, 11)),
                meeting(MeetingStatus::Scheduled, at(2026, 5, 9)),
            ],
            projects: vec![active, held],
            client_count: 4,
            team_member_count: 3,
        }
    }

    #[test]
    fn admin_metrics_roll_up_the_snapshot() {
        let metrics = compute_admin_metrics(&snapshot(), at(2026, 5, 10));

        assert_eq!(metrics.total_projects, 2);
        assert_eq!(metrics.active_projects, 1);
        assert_eq!(metrics.total_clients, 4);
        assert_eq!(metrics.team_members, 3);
        assert_eq!(metrics.total_revenue, dec!(5000));
        assert_eq!(metrics.outstanding_revenue, dec!(1500));
        assert_eq!(metrics.total_team_costs, dec!(2000));
        assert_eq!(metrics.net_profit, dec!(3000));
        assert_eq!(metrics.overdue_deliverables, 1);
        assert_eq!(metrics.upcoming_meetings, 1);
    }

    #[test]
    fn empty_snapshot_yields_zero_metrics() {
        let metrics = compute_admin_metrics(&AdminSnapshot::default(), at(2026, 5, 10));
        assert_eq!(metrics, AdminMetrics::default());
    }

    #[test]
    fn distributions_list_every_status_in_order() {
        let charts = compute_admin_charts(&snapshot(), at(2026, 5, 10));

        let projects: Vec<(&str, usize)> = charts
            .project_status
            .iter()
            .map(|c| (c.status, c.count))
            .collect();
        assert_eq!(
            projects,
            vec![
                ("planning", 0),
                ("active", 1),
                ("on_hold", 1),
                ("completed", 0),
                ("cancelled", 0),
            ]
        );

        let payments: Vec<usize> = charts.payment_status.iter().map(|c| c.count).collect();
        assert_eq!(payments, vec![1, 0, 1, 1]);
        assert_eq!(charts.deliverable_status.len(), 4);
        assert_eq!(charts.revenue_trend.len(), 6);
        assert_eq!(charts.revenue_trend[5].profit, dec!(3000));
    }
}
