use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{dates, errors::PlanError};

use super::{
    holiday::{Holiday, HolidayPatch, DEFAULT_HOLIDAY_HOURS, DEFAULT_HOLIDAY_NAME},
    range::{coerce_hours, DateRange},
    selection::Selection,
};

/// How often a paycheck (and its accrual) lands. The values are passed
/// through to the forecasting engine verbatim; the core never interprets
/// them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaySchedule {
    Weekly,
    #[default]
    Biweekly,
    Semimonthly,
    Monthly,
}

/// Raw form inputs driving the forecast. Numeric fields are already coerced
/// (blank or unparseable entry becomes 0) by the time they land here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FormInputs {
    pub pto_today: f64,
    pub accrual_rate: f64,
    pub schedule: PaySchedule,
    pub next_pay_date: Option<NaiveDate>,
    pub include_weekends: bool,
    pub nine_eighty: bool,
    pub nine_eighty_anchor: Option<NaiveDate>,
}

/// Aggregate root for one planning session: the committed ledger of ranges
/// and holidays, the in-progress selection, the form inputs, and the latest
/// forecast overlay.
///
/// `balances` is always a pure function of the last successful forecast
/// response; on failure it is cleared, never stale-merged. `selection` and
/// `balances` are transient and excluded from persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanningState {
    pub view_month: NaiveDate,
    pub selection: Selection,
    pub ranges: Vec<DateRange>,
    pub holidays: Vec<Holiday>,
    pub holidays_initialized: bool,
    pub inputs: FormInputs,
    pub balances: BTreeMap<NaiveDate, f64>,
}

impl PlanningState {
    pub fn new(view_month: NaiveDate) -> Self {
        Self {
            view_month: dates::month_start(view_month),
            selection: Selection::Empty,
            ranges: Vec::new(),
            holidays: Vec::new(),
            holidays_initialized: false,
            inputs: FormInputs::default(),
            balances: BTreeMap::new(),
        }
    }

    /// Appends a new booking with the 8-hour default and no overrides.
    /// Overlapping ranges are permitted; their hours sum at aggregation.
    pub fn add_range(&mut self, start: NaiveDate, end: NaiveDate) {
        self.add_range_with_hours(start, end, super::range::DEFAULT_RANGE_HOURS);
    }

    pub fn add_range_with_hours(&mut self, start: NaiveDate, end: NaiveDate, default_hours: f64) {
        let range = DateRange::with_hours(start, end, default_hours);
        tracing::debug!(start = %range.start, end = %range.end, "range added");
        self.ranges.push(range);
    }

    /// Positional delete; remaining indices shift down.
    pub fn remove_range(&mut self, index: usize) -> Result<DateRange, PlanError> {
        if index >= self.ranges.len() {
            return Err(PlanError::InvalidRef(format!("no range at index {}", index)));
        }
        Ok(self.ranges.remove(index))
    }

    /// Stores a per-day override on the range at `index`. The date must fall
    /// within that range's bounds; hours are coerced to the valid domain.
    pub fn set_override(
        &mut self,
        index: usize,
        date: NaiveDate,
        hours: f64,
    ) -> Result<(), PlanError> {
        let range = self
            .ranges
            .get_mut(index)
            .ok_or_else(|| PlanError::InvalidRef(format!("no range at index {}", index)))?;
        range.set_override(date, coerce_hours(hours))
    }

    /// Resolved hours for one day of one range: override if present, else the
    /// range default.
    pub fn effective_hours(&self, index: usize, date: NaiveDate) -> Option<f64> {
        self.ranges.get(index).map(|range| range.effective_hours(date))
    }

    /// Adds a user holiday with the stock name and hours. Returns `None`
    /// without touching state when a holiday already occupies `date`.
    pub fn add_holiday(&mut self, date: NaiveDate) -> Option<Uuid> {
        self.add_holiday_with(date, DEFAULT_HOLIDAY_NAME, DEFAULT_HOLIDAY_HOURS)
    }

    pub fn add_holiday_with(
        &mut self,
        date: NaiveDate,
        name: impl Into<String>,
        hours: f64,
    ) -> Option<Uuid> {
        if self.holiday_at(date).is_some() {
            tracing::debug!(%date, "duplicate holiday rejected");
            return None;
        }
        let holiday = Holiday::new(date, name, hours);
        let id = holiday.id;
        self.holidays.push(holiday);
        self.holidays_initialized = true;
        Some(id)
    }

    pub fn remove_holiday(&mut self, id: Uuid) -> bool {
        let before = self.holidays.len();
        self.holidays.retain(|holiday| holiday.id != id);
        self.holidays.len() != before
    }

    /// Edits one field of a holiday in place. Moving a holiday onto a date
    /// already occupied by another is NOT de-duplicated; both entries remain.
    pub fn update_holiday(&mut self, id: Uuid, patch: HolidayPatch) -> bool {
        let Some(holiday) = self.holidays.iter_mut().find(|holiday| holiday.id == id) else {
            return false;
        };
        match patch {
            HolidayPatch::Name(name) => holiday.name = name,
            HolidayPatch::Date(date) => holiday.date = date,
            HolidayPatch::Hours(hours) => holiday.hours = coerce_hours(hours),
        }
        true
    }

    /// Replaces the holiday set with a server-suggested one and marks
    /// holidays as user-owned from here on.
    pub fn adopt_holidays(&mut self, suggestions: Vec<Holiday>) {
        tracing::debug!(count = suggestions.len(), "adopting suggested holidays");
        self.holidays = suggestions;
        self.holidays_initialized = true;
    }

    /// Union predicate: whether any stored range covers `date`.
    pub fn is_booked(&self, date: NaiveDate) -> bool {
        self.ranges.iter().any(|range| range.contains(date))
    }

    pub fn holiday_at(&self, date: NaiveDate) -> Option<&Holiday> {
        self.holidays.iter().find(|holiday| holiday.date == date)
    }

    /// Date-ordered view of the holidays, for display.
    pub fn holidays_sorted(&self) -> Vec<&Holiday> {
        let mut sorted: Vec<&Holiday> = self.holidays.iter().collect();
        sorted.sort_by_key(|holiday| holiday.date);
        sorted
    }

    pub fn set_view_month(&mut self, month: NaiveDate) {
        self.view_month = dates::month_start(month);
    }
}
