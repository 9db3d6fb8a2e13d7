use rust_decimal::Decimal;
use serde::Serialize;

use crate::record::PaymentRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaymentTotals {
    pub total_paid: Decimal,
    pub total_outstanding: Decimal,
    pub paid_count: usize,
    pub outstanding_count: usize,
    pub total_count: usize,
}

/// Sums paid and outstanding amounts. Currencies are added nominally.
pub fn compute_totals<P: PaymentRecord>(payments: &[P]) -> PaymentTotals {
    payments
        .iter()
        .fold(PaymentTotals::default(), |mut totals, payment| {
            totals.total_count += 1;
            if payment.is_paid() {
                totals.total_paid += payment.amount();
                totals.paid_count += 1;
            } else if payment.is_outstanding() {
                totals.total_outstanding += payment.amount();
                totals.outstanding_count += 1;
            }
            totals
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{at, team_payment};
    use clientdesk_types::PaymentStatus;
    use rust_decimal::dec;
    use uuid::Uuid;

    #[test]
    fn only_paid_payments_count_towards_total_paid() {
        let user = Uuid::new_v4();
        let payments = vec![
            team_payment(user, dec!(100), PaymentStatus::Paid, at(2026, 1, 5)),
            team_payment(user, dec!(50), PaymentStatus::Pending, at(2026, 1, 6)),
        ];

        let totals = compute_totals(&payments);

        assert_eq!(totals.total_paid, dec!(100));
        assert_eq!(totals.total_outstanding, dec!(50));
        assert_eq!(totals.paid_count, 1);
        assert_eq!(totals.total_count, 2);
    }

    #[test]
    fn cancelled_payments_are_neither_paid_nor_outstanding() {
        let user = Uuid::new_v4();
        let payments = vec![
            team_payment(user, dec!(20), PaymentStatus::Cancelled, at(2026, 2, 1)),
            team_payment(user, dec!(30), PaymentStatus::Approved, at(2026, 2, 1)),
        ];

        let totals = compute_totals(&payments);

        assert_eq!(totals.total_paid, Decimal::ZERO);
        assert_eq!(totals.total_outstanding, dec!(30));
        assert_eq!(totals.outstanding_count, 1);
    }

    #[test]
    fn totals_do_not_depend_on_order() {
        let user = Uuid::new_v4();
        let mut payments = vec![
            team_payment(user, dec!(10.50), PaymentStatus::Paid, at(2026, 1, 1)),
            team_payment(user, dec!(4.25), PaymentStatus::Paid, at(2026, 1, 2)),
            team_payment(user, dec!(99), PaymentStatus::Pending, at(2026, 1, 3)),
        ];
        let forward = compute_totals(&payments);
        payments.reverse();

        assert_eq!(compute_totals(&payments), forward);
        assert_eq!(forward.total_paid, dec!(14.75));
    }

    #[test]
    fn empty_input_yields_zero_totals() {
        let payments: Vec<clientdesk_db::models::TeamPayment> = Vec::new();
        assert_eq!(compute_totals(&payments), PaymentTotals::default());
    }
}
