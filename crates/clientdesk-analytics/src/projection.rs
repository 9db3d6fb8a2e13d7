use chrono::{DateTime, Utc};
use clientdesk_db::models::{TeamPayment, TeamPaymentRate};
use clientdesk_types::RateType;
use rust_decimal::{Decimal, dec};
use serde::Serialize;
use uuid::Uuid;

use crate::calendar::{month_bounds, month_start, shift_months, start_of_day};
use crate::record::PaymentRecord;

/// Working hours assumed per month when turning hourly rates into a monthly figure.
pub const HOURS_PER_MONTH: Decimal = dec!(160);

pub const TRAILING_MONTHS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EarningsProjection {
    pub user_id: Uuid,
    pub current_month_earnings: Decimal,
    pub trailing_average: Decimal,
    pub rate_based_estimate: Decimal,
    pub projected_next_month: Decimal,
    pub active_rates: usize,
}

fn active_rates_of(rates: &[TeamPaymentRate], rate_type: RateType) -> impl Iterator<Item = Decimal> + '_ {
    rates
        .iter()
        .filter(|r| r.is_active)
        .filter(move |r| r.rate_type.parse::<RateType>().is_ok_and(|t| t == rate_type))
        .map(|r| r.rate_amount)
}

/// Sum of active salaries plus the average active hourly rate over a month of work.
/// Bonus rates are not recurring and are left out.
pub fn rate_based_estimate(rates: &[TeamPaymentRate]) -> Decimal {
    let salaries: Decimal = active_rates_of(rates, RateType::Salary).sum();

    let hourly: Vec<Decimal> = active_rates_of(rates, RateType::Hourly).collect();
    let hourly_average = if hourly.is_empty() {
        Decimal::ZERO
    } else {
        hourly.iter().sum::<Decimal>() / Decimal::from(hourly.len())
    };

    salaries + hourly_average * HOURS_PER_MONTH
}

/// Larger of the rate-based estimate and the realized trailing average.
pub fn project_next_month(rates: &[TeamPaymentRate], last_3_months_avg: Decimal) -> Decimal {
    rate_based_estimate(rates).max(last_3_months_avg)
}

/// Paid amount over the `months` full calendar months before the month of `now`, per month.
pub fn trailing_monthly_average<P: PaymentRecord>(
    payments: &[P],
    now: DateTime<Utc>,
    months: u32,
) -> Decimal {
    if months == 0 {
        return Decimal::ZERO;
    }

    let current = month_start(now.date_naive());
    let start = start_of_day(shift_months(current, -(months as i32)));
    let end = start_of_day(current);

    let total: Decimal = payments
        .iter()
        .filter(|p| p.is_paid())
        .filter(|p| {
            let date = p.effective_date();
            date >= start && date < end
        })
        .map(PaymentRecord::amount)
        .sum();

    (total / Decimal::from(months)).round_dp(2)
}

pub fn compute_earnings_projection(
    user_id: Uuid,
    team_payments: &[TeamPayment],
    rates: &[TeamPaymentRate],
    now: DateTime<Utc>,
) -> EarningsProjection {
    let own_payments: Vec<&TeamPayment> =
        team_payments.iter().filter(|p| p.user_id == user_id).collect();
    let own_rates: Vec<TeamPaymentRate> = rates
        .iter()
        .filter(|r| r.user_id == user_id)
        .cloned()
        .collect();

    let (month_start_at, month_end_at) = month_bounds(month_start(now.date_naive()));
    let current_month_earnings = own_payments
        .iter()
        .filter(|p| p.is_paid())
        .filter(|p| {
            let date = p.effective_date();
            date >= month_start_at && date < month_end_at
        })
        .map(|p| p.amount)
        .sum();

    let trailing_average = trailing_monthly_average(&own_payments, now, TRAILING_MONTHS);
    let rate_based_estimate = rate_based_estimate(&own_rates);

    EarningsProjection {
        user_id,
        current_month_earnings,
        trailing_average,
        rate_based_estimate,
        projected_next_month: rate_based_estimate.max(trailing_average),
        active_rates: own_rates.iter().filter(|r| r.is_active).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{at, rate, team_payment};
    use clientdesk_types::PaymentStatus;

    #[test]
    fn salary_alone_beats_an_empty_history() {
        let user = Uuid::new_v4();
        let rates = vec![rate(user, RateType::Salary, dec!(3000), true)];

        assert_eq!(project_next_month(&rates, Decimal::ZERO), dec!(3000));
    }

    #[test]
    fn hourly_rates_are_averaged_over_a_month_of_work() {
        let user = Uuid::new_v4();
        let rates = vec![
            rate(user, RateType::Salary, dec!(1000), true),
            rate(user, RateType::Hourly, dec!(20), true),
            rate(user, RateType::Hourly, dec!(30), true),
            rate(user, RateType::Hourly, dec!(500), false),
            rate(user, RateType::Bonus, dec!(10000), true),
        ];

        assert_eq!(rate_based_estimate(&rates), dec!(5000));
    }

    #[test]
    fn historical_average_wins_when_higher() {
        let user = Uuid::new_v4();
        let rates = vec![rate(user, RateType::Salary, dec!(3000), true)];

        assert_eq!(project_next_month(&rates, dec!(4200)), dec!(4200));
        assert_eq!(project_next_month(&[], dec!(4200)), dec!(4200));
    }

    #[test]
    fn trailing_average_skips_the_current_month() {
        let user = Uuid::new_v4();
        let now = at(2026, 6, 15);
        let payments = vec![
            team_payment(user, dec!(900), PaymentStatus::Paid, at(2026, 3, 10)),
            team_payment(user, dec!(600), PaymentStatus::Paid, at(2026, 5, 31)),
            team_payment(user, dec!(5000), PaymentStatus::Paid, at(2026, 6, 1)),
            team_payment(user, dec!(7000), PaymentStatus::Paid, at(2026, 2, 27)),
            team_payment(user, dec!(300), PaymentStatus::Pending, at(2026, 4, 1)),
        ];

        assert_eq!(trailing_monthly_average(&payments, now, 3), dec!(500));
        assert_eq!(trailing_monthly_average(&payments, now, 0), Decimal::ZERO);
    }

    #[test]
    fn earnings_projection_only_looks_at_the_member() {
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();
        let now = at(2026, 6, 15);
        let payments = vec![
            team_payment(user, dec!(1200), PaymentStatus::Paid, at(2026, 6, 2)),
            team_payment(user, dec!(3000), PaymentStatus::Paid, at(2026, 4, 2)),
            team_payment(other, dec!(9999), PaymentStatus::Paid, at(2026, 6, 2)),
        ];
        let rates = vec![
            rate(user, RateType::Hourly, dec!(10), true),
            rate(other, RateType::Salary, dec!(8000), true),
        ];

        let projection = compute_earnings_projection(user, &payments, &rates, now);

        assert_eq!(projection.current_month_earnings, dec!(1200));
        assert_eq!(projection.trailing_average, dec!(1000));
        assert_eq!(projection.rate_based_estimate, dec!(1600));
        assert_eq!(projection.projected_next_month, dec!(1600));
        assert_eq!(projection.active_rates, 1);
    }
}
