use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::record::PaymentRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamMemberStats {
    pub user_id: Uuid,
    pub total_paid: Decimal,
    /// Total divided by the number of distinct months holding at least one payment.
    pub average_monthly: Decimal,
    pub last_payment: Option<DateTime<Utc>>,
    pub payment_count: usize,
}

#[derive(Default)]
struct Accumulator {
    total: Decimal,
    months: HashSet<(i32, u32)>,
    last: Option<DateTime<Utc>>,
    count: usize,
}

/// Paid payouts grouped per team member, highest earner first.
pub fn compute_team_member_stats<P: PaymentRecord>(team_payments: &[P]) -> Vec<TeamMemberStats> {
    let mut per_user: HashMap<Uuid, Accumulator> = HashMap::new();

    for payment in team_payments.iter().filter(|p| p.is_paid()) {
        let Some(user_id) = payment.user_id() else {
            continue;
        };
        let date = payment.effective_date();
        let acc = per_user.entry(user_id).or_default();
        acc.total += payment.amount();
        acc.months.insert((date.year(), date.month()));
        acc.last = acc.last.max(Some(date));
        acc.count += 1;
    }

    let mut stats: Vec<TeamMemberStats> = per_user
        .into_iter()
        .map(|(user_id, acc)| {
            let average_monthly = if acc.months.is_empty() {
                Decimal::ZERO
            } else {
                (acc.total / Decimal::from(acc.months.len())).round_dp(2)
            };
            TeamMemberStats {
                user_id,
                total_paid: acc.total,
                average_monthly,
                last_payment: acc.last,
                payment_count: acc.count,
            }
        })
        .collect();

    stats.sort_by(|a, b| {
        b.total_paid
            .cmp(&a.total_paid)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{at, team_payment};
    use clientdesk_types::PaymentStatus;
    use rust_decimal::dec;

    #[test]
    fn average_divides_by_months_with_payments() {
        let alice = Uuid::new_v4();
        let payments = vec![
            team_payment(alice, dec!(1000), PaymentStatus::Paid, at(2026, 1, 5)),
            team_payment(alice, dec!(500), PaymentStatus::Paid, at(2026, 1, 25)),
            team_payment(alice, dec!(1500), PaymentStatus::Paid, at(2026, 4, 2)),
            team_payment(alice, dec!(700), PaymentStatus::Pending, at(2026, 5, 2)),
        ];

        let stats = compute_team_member_stats(&payments);

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].total_paid, dec!(3000));
        assert_eq!(stats[0].average_monthly, dec!(1500));
        assert_eq!(stats[0].payment_count, 3);
        assert_eq!(stats[0].last_payment, Some(at(2026, 4, 2)));
    }

    #[test]
    fn last_payment_prefers_payment_date() {
        let bob = Uuid::new_v4();
        let mut payout = team_payment(bob, dec!(10), PaymentStatus::Paid, at(2026, 1, 1));
        payout.payment_date = Some(at(2026, 2, 14));

        let stats = compute_team_member_stats(&[payout]);

        assert_eq!(stats[0].last_payment, Some(at(2026, 2, 14)));
    }

    #[test]
    fn members_are_ordered_by_total_paid() {
        let low = Uuid::new_v4();
        let high = Uuid::new_v4();
        let payments = vec![
            team_payment(low, dec!(10), PaymentStatus::Paid, at(2026, 1, 1)),
            team_payment(high, dec!(90), PaymentStatus::Paid, at(2026, 1, 1)),
        ];

        let stats = compute_team_member_stats(&payments);

        assert_eq!(stats[0].user_id, high);
        assert_eq!(stats[1].user_id, low);
    }
}
