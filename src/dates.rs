//! Calendar-local date arithmetic shared by the planner and the forecast
//! payload builder. All dates are naive `YYYY-MM-DD` days; no time or
//! timezone component is ever retained.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

const ISO_FORMAT: &str = "%Y-%m-%d";

/// Formats a date as its ISO `YYYY-MM-DD` key.
pub fn to_key(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

/// Parses an ISO `YYYY-MM-DD` key back into a date.
pub fn parse_key(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, ISO_FORMAT).ok()
}

/// Enumerates every day from `start` through `end` inclusive, ascending.
/// Returns an empty sequence when `start > end`; callers are expected to
/// pass ordered bounds.
pub fn enumerate_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut cursor = start;
    while cursor <= end {
        days.push(cursor);
        cursor += Duration::days(1);
    }
    days
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Shifts by whole months, clamping the day to the target month's length.
/// A shift that would land outside the representable calendar leaves the
/// date unchanged; extreme offsets never overflow or panic.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let index = i64::from(date.year()) * 12 + i64::from(date.month0());
    let shifted = index.saturating_add(i64::from(months));
    let year = shifted.div_euclid(12);
    let month = shifted.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    i32::try_from(year)
        .ok()
        .and_then(|year| NaiveDate::from_ymd_opt(year, month, day))
        .unwrap_or(date)
}

/// Last day of the month containing `date`.
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let first = month_start(date);
    add_months(first, 1) - Duration::days(1)
}

/// January 1st and December 31st of the year containing `date`.
pub fn year_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let year = date.year();
    (
        NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(date),
        NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(date),
    )
}

fn days_in_month(year: i64, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    i32::try_from(next_year)
        .ok()
        .and_then(|next_year| NaiveDate::from_ymd_opt(next_year, next_month, 1))
        .map(|first_next| (first_next - Duration::days(1)).day())
        .unwrap_or(28)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn iso_key_round_trips() {
        let date = day(2024, 7, 4);
        assert_eq!(to_key(date), "2024-07-04");
        assert_eq!(parse_key(&to_key(date)), Some(date));
    }

    #[test]
    fn enumerate_days_is_inclusive_and_ordered() {
        let days = enumerate_days(day(2024, 2, 27), day(2024, 3, 2));
        assert_eq!(days.len(), 5);
        assert!(days.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(days[2], day(2024, 2, 29));
    }

    #[test]
    fn enumerate_days_with_inverted_bounds_is_empty() {
        assert!(enumerate_days(day(2024, 5, 2), day(2024, 5, 1)).is_empty());
    }

    #[test]
    fn month_arithmetic_clamps_day() {
        assert_eq!(add_months(day(2024, 1, 31), 1), day(2024, 2, 29));
        assert_eq!(add_months(day(2024, 3, 15), -3), day(2023, 12, 15));
        assert_eq!(last_day_of_month(day(2024, 6, 10)), day(2024, 6, 30));
    }

    #[test]
    fn add_months_tolerates_extreme_shifts() {
        let date = day(2024, 6, 15);
        assert_eq!(add_months(date, i32::MAX), date);
        assert_eq!(add_months(date, i32::MIN), date);
        assert_eq!(add_months(date, 0), date);
    }

    #[test]
    fn year_bounds_span_the_calendar_year() {
        let (start, end) = year_bounds(day(2024, 6, 1));
        assert_eq!(start, day(2024, 1, 1));
        assert_eq!(end, day(2024, 12, 31));
    }

    #[test]
    fn weekend_predicate() {
        assert!(is_weekend(day(2024, 7, 6)));
        assert!(is_weekend(day(2024, 7, 7)));
        assert!(!is_weekend(day(2024, 7, 8)));
    }
}
