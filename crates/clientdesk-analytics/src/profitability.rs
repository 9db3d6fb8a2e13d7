use std::collections::HashMap;

use clientdesk_db::models::Project;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::record::PaymentRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectProfitability {
    pub project_id: Uuid,
    pub project_name: String,
    pub project_status: String,
    pub revenue: Decimal,
    pub team_cost: Decimal,
    pub profit: Decimal,
    /// Percentage of revenue kept as profit, zero when there is no revenue.
    pub margin: Decimal,
}

fn paid_by_project<P: PaymentRecord>(payments: &[P]) -> HashMap<Uuid, Decimal> {
    let mut sums: HashMap<Uuid, Decimal> = HashMap::new();
    for payment in payments.iter().filter(|p| p.is_paid()) {
        if let Some(project_id) = payment.project_id() {
            *sums.entry(project_id).or_default() += payment.amount();
        }
    }
    sums
}

/// One row per project, in the order the projects were given.
pub fn compute_project_profitability<T, C>(
    projects: &[Project],
    team_payments: &[T],
    client_payments: &[C],
) -> Vec<ProjectProfitability>
where
    T: PaymentRecord,
    C: PaymentRecord,
{
    let costs = paid_by_project(team_payments);
    let revenues = paid_by_project(client_payments);

    projects
        .iter()
        .map(|project| {
            let revenue = revenues.get(&project.id).copied().unwrap_or_default();
            let team_cost = costs.get(&project.id).copied().unwrap_or_default();
            let profit = revenue - team_cost;
            let margin = if revenue.is_zero() {
                Decimal::ZERO
            } else {
                (profit / revenue * Decimal::ONE_HUNDRED).round_dp(2)
            };

            ProjectProfitability {
                project_id: project.id,
                project_name: project.name.clone(),
                project_status: project.status.clone(),
                revenue,
                team_cost,
                profit,
                margin,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{at, client_payment, project, team_payment};
    use clientdesk_types::{PaymentStatus, ProjectStatus};
    use rust_decimal::dec;

    #[test]
    fn profit_and_margin_use_paid_amounts_only() {
        let site = project("Website", ProjectStatus::Active);
        let user = Uuid::new_v4();

        let mut cost = team_payment(user, dec!(250), PaymentStatus::Paid, at(2026, 3, 1));
        cost.project_id = Some(site.id);
        let mut unpaid_cost = team_payment(user, dec!(999), PaymentStatus::Pending, at(2026, 3, 2));
        unpaid_cost.project_id = Some(site.id);
        let revenue = client_payment(site.id, dec!(1000), PaymentStatus::Paid, at(2026, 3, 3));
        let unpaid_revenue = client_payment(site.id, dec!(500), PaymentStatus::Approved, at(2026, 3, 4));

        let rows = compute_project_profitability(
            std::slice::from_ref(&site),
            &[cost, unpaid_cost],
            &[revenue, unpaid_revenue],
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].revenue, dec!(1000));
        assert_eq!(rows[0].team_cost, dec!(250));
        assert_eq!(rows[0].profit, dec!(750));
        assert_eq!(rows[0].margin, dec!(75));
    }

    #[test]
    fn zero_revenue_yields_zero_margin() {
        let idle = project("Idle", ProjectStatus::Planning);
        let mut cost = team_payment(Uuid::new_v4(), dec!(80), PaymentStatus::Paid, at(2026, 3, 1));
        cost.project_id = Some(idle.id);
        let no_revenue: Vec<clientdesk_db::models::Payment> = Vec::new();

        let rows = compute_project_profitability(std::slice::from_ref(&idle), &[cost], &no_revenue);

        assert_eq!(rows[0].profit, dec!(-80));
        assert_eq!(rows[0].margin, Decimal::ZERO);
    }

    #[test]
    fn payments_for_unknown_projects_are_ignored() {
        let known = project("Known", ProjectStatus::Active);
        let stray = client_payment(Uuid::new_v4(), dec!(40), PaymentStatus::Paid, at(2026, 3, 1));
        let no_costs: Vec<clientdesk_db::models::TeamPayment> = Vec::new();

        let rows = compute_project_profitability(std::slice::from_ref(&known), &no_costs, &[stray]);

        assert_eq!(rows[0].revenue, Decimal::ZERO);
    }
}
