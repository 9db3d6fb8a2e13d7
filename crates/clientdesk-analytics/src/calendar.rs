use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, Utc};

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Moves a first-of-month date by `delta` calendar months.
pub fn shift_months(month: NaiveDate, delta: i32) -> NaiveDate {
    let step = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        month.checked_add_months(step)
    } else {
        month.checked_sub_months(step)
    };
    shifted.unwrap_or(month)
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// `[start, end)` bounds of the month starting at `month`.
pub fn month_bounds(month: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    (start_of_day(month), start_of_day(shift_months(month, 1)))
}

/// Short label such as `Mar 2026`.
pub fn month_label(month: NaiveDate) -> String {
    month.format("%b %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shifting_crosses_year_boundaries() {
        let jan = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(
            shift_months(jan, -1),
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
        );
        assert_eq!(
            shift_months(jan, 13),
            NaiveDate::from_ymd_opt(2027, 2, 1).unwrap()
        );
    }

    #[test]
    fn month_bounds_are_half_open() {
        let feb = NaiveDate::from_ymd_opt(2028, 2, 1).unwrap();
        let (start, end) = month_bounds(feb);
        assert_eq!(start.to_rfc3339(), "2028-02-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2028-03-01T00:00:00+00:00");
        assert_eq!(month_label(feb), "Feb 2028");
    }
}
