use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{dates, errors::PlanError};

pub const DEFAULT_RANGE_HOURS: f64 = 8.0;

/// Clamps a user-entered hour figure to the valid domain: non-finite and
/// negative values collapse to 0.
pub fn coerce_hours(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// A committed booking spanning consecutive calendar days. Every day debits
/// `default_hours` unless an override shadows it for that date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub default_hours: f64,
    #[serde(default)]
    pub overrides: BTreeMap<NaiveDate, f64>,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self::with_hours(start, end, DEFAULT_RANGE_HOURS)
    }

    /// Bounds are normalized so that `start <= end` always holds.
    pub fn with_hours(start: NaiveDate, end: NaiveDate, default_hours: f64) -> Self {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        Self {
            start,
            end,
            default_hours: coerce_hours(default_hours),
            overrides: BTreeMap::new(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every day of the range, ascending.
    pub fn days(&self) -> Vec<NaiveDate> {
        dates::enumerate_days(self.start, self.end)
    }

    /// Override for `date` when present (any stored value, including an
    /// explicit 0), otherwise the range default.
    pub fn effective_hours(&self, date: NaiveDate) -> f64 {
        self.overrides
            .get(&date)
            .copied()
            .unwrap_or(self.default_hours)
    }

    /// Stores a per-day override. The date must fall within the range.
    pub fn set_override(&mut self, date: NaiveDate, hours: f64) -> Result<(), PlanError> {
        if !self.contains(date) {
            return Err(PlanError::InvalidRef(format!(
                "override date {} outside range {}..={}",
                date, self.start, self.end
            )));
        }
        self.overrides.insert(date, coerce_hours(hours));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    #[test]
    fn inverted_bounds_are_normalized() {
        let range = DateRange::new(day(10), day(4));
        assert_eq!((range.start, range.end), (day(4), day(10)));
    }

    #[test]
    fn override_shadows_default_including_zero() {
        let mut range = DateRange::new(day(1), day(5));
        range.set_override(day(3), 0.0).unwrap();
        range.set_override(day(4), 4.5).unwrap();
        assert_eq!(range.effective_hours(day(2)), DEFAULT_RANGE_HOURS);
        assert_eq!(range.effective_hours(day(3)), 0.0);
        assert_eq!(range.effective_hours(day(4)), 4.5);
    }

    #[test]
    fn override_outside_range_is_rejected() {
        let mut range = DateRange::new(day(1), day(5));
        assert!(range.set_override(day(6), 8.0).is_err());
        assert!(range.overrides.is_empty());
    }

    #[test]
    fn hours_coercion_collapses_invalid_values() {
        assert_eq!(coerce_hours(f64::NAN), 0.0);
        assert_eq!(coerce_hours(f64::INFINITY), 0.0);
        assert_eq!(coerce_hours(-3.0), 0.0);
        assert_eq!(coerce_hours(7.5), 7.5);
    }
}
