use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::calendar::{month_bounds, month_label, month_start, shift_months};
use crate::record::PaymentRecord;

pub const DEFAULT_MONTHS_BACK: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyBucket {
    pub month: String,
    pub month_start: NaiveDate,
    pub team_costs: Decimal,
    pub client_payments: Decimal,
    pub profit: Decimal,
}

fn paid_within<P: PaymentRecord>(
    payments: &[P],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Decimal {
    payments
        .iter()
        .filter(|p| p.is_paid())
        .filter(|p| {
            let date = p.effective_date();
            date >= start && date < end
        })
        .map(PaymentRecord::amount)
        .sum()
}

/// Trailing calendar months ending with the month of `now`, oldest first.
///
/// Always returns exactly `months_back` buckets, empty months included.
pub fn compute_monthly_trend<T, C>(
    team_payments: &[T],
    client_payments: &[C],
    months_back: u32,
    now: DateTime<Utc>,
) -> Vec<MonthlyBucket>
where
    T: PaymentRecord,
    C: PaymentRecord,
{
    let current = month_start(now.date_naive());

    (0..months_back)
        .rev()
        .map(|offset| {
            let month = shift_months(current, -(offset as i32));
            let (start, end) = month_bounds(month);
            let team_costs = paid_within(team_payments, start, end);
            let client_payments = paid_within(client_payments, start, end);

            MonthlyBucket {
                month: month_label(month),
                month_start: month,
                team_costs,
                client_payments,
                profit: client_payments - team_costs,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{at, client_payment, team_payment};
    use clientdesk_db::models::{Payment, TeamPayment};
    use clientdesk_types::PaymentStatus;
    use rust_decimal::dec;
    use uuid::Uuid;

    #[test]
    fn empty_input_still_yields_every_bucket() {
        let team: Vec<TeamPayment> = Vec::new();
        let clients: Vec<Payment> = Vec::new();

        let buckets = compute_monthly_trend(&team, &clients, DEFAULT_MONTHS_BACK, at(2026, 3, 15));

        assert_eq!(buckets.len(), 6);
        assert!(buckets.iter().all(|b| b.profit.is_zero()));
        assert_eq!(buckets[0].month, "Oct 2025");
        assert_eq!(buckets[5].month, "Mar 2026");
    }

    #[test]
    fn paid_payments_land_in_their_month() {
        let user = Uuid::new_v4();
        let project = Uuid::new_v4();

        let mut late_paid = team_payment(user, dec!(300), PaymentStatus::Paid, at(2026, 1, 20));
        late_paid.payment_date = Some(at(2026, 2, 3));
        let team = vec![
            late_paid,
            team_payment(user, dec!(100), PaymentStatus::Pending, at(2026, 2, 10)),
        ];
        let clients = vec![
            client_payment(project, dec!(1000), PaymentStatus::Paid, at(2026, 2, 28)),
            client_payment(project, dec!(400), PaymentStatus::Paid, at(2026, 3, 1)),
        ];

        let buckets = compute_monthly_trend(&team, &clients, 3, at(2026, 3, 15));

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].month, "Jan 2026");
        assert!(buckets[0].team_costs.is_zero());
        assert_eq!(buckets[1].team_costs, dec!(300));
        assert_eq!(buckets[1].client_payments, dec!(1000));
        assert_eq!(buckets[1].profit, dec!(700));
        assert_eq!(buckets[2].client_payments, dec!(400));
        assert_eq!(buckets[2].profit, dec!(400));
    }

    #[test]
    fn zero_months_back_yields_no_buckets() {
        let team: Vec<TeamPayment> = Vec::new();
        let clients: Vec<Payment> = Vec::new();
        assert!(compute_monthly_trend(&team, &clients, 0, at(2026, 3, 15)).is_empty());
    }
}
