use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::record::PaymentRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverduePayment {
    pub payment_id: Uuid,
    pub user_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub amount: Decimal,
    pub currency: String,
    pub status: String,
    pub due_date: DateTime<Utc>,
    pub days_past_due: i64,
}

/// Outstanding payments whose due date is strictly before `now`, latest first.
pub fn compute_overdue<P: PaymentRecord>(payments: &[P], now: DateTime<Utc>) -> Vec<OverduePayment> {
    let mut overdue: Vec<OverduePayment> = payments
        .iter()
        .filter(|p| p.is_outstanding())
        .filter_map(|p| {
            let due_date = p.due_date().filter(|due| *due < now)?;
            Some(OverduePayment {
                payment_id: p.id(),
                user_id: p.user_id(),
                project_id: p.project_id(),
                amount: p.amount(),
                currency: p.currency().to_string(),
                status: p.status().to_string(),
                due_date,
                days_past_due: (now - due_date).num_days(),
            })
        })
        .collect();

    overdue.sort_by(|a, b| {
        a.due_date
            .cmp(&b.due_date)
            .then_with(|| a.payment_id.cmp(&b.payment_id))
    });
    overdue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{at, team_payment};
    use chrono::Duration;
    use clientdesk_types::PaymentStatus;
    use rust_decimal::dec;

    #[test]
    fn excludes_missing_and_future_due_dates() {
        let user = Uuid::new_v4();
        let now = at(2026, 5, 10);

        let no_due = team_payment(user, dec!(1), PaymentStatus::Pending, at(2026, 4, 1));
        let mut due_now = team_payment(user, dec!(2), PaymentStatus::Pending, at(2026, 4, 1));
        due_now.due_date = Some(now);
        let mut due_later = team_payment(user, dec!(3), PaymentStatus::Approved, at(2026, 4, 1));
        due_later.due_date = Some(now + Duration::days(2));
        let mut paid_late = team_payment(user, dec!(4), PaymentStatus::Paid, at(2026, 4, 1));
        paid_late.due_date = Some(at(2026, 4, 2));

        let overdue = compute_overdue(&[no_due, due_now, due_later, paid_late], now);

        assert!(overdue.is_empty());
    }

    #[test]
    fn days_past_due_are_floored_and_sorted_latest_first() {
        let user = Uuid::new_v4();
        let now = at(2026, 5, 10);

        let mut slightly = team_payment(user, dec!(100), PaymentStatus::Pending, at(2026, 4, 1));
        slightly.due_date = Some(now - Duration::hours(30));
        let mut very = team_payment(user, dec!(200), PaymentStatus::Approved, at(2026, 4, 1));
        very.due_date = Some(now - Duration::days(12) - Duration::hours(5));

        let overdue = compute_overdue(&[slightly, very], now);

        assert_eq!(overdue.len(), 2);
        assert_eq!(overdue[0].amount, dec!(200));
        assert_eq!(overdue[0].days_past_due, 12);
        assert_eq!(overdue[1].days_past_due, 1);
    }
}
