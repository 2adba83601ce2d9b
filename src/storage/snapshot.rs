use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::PlanError,
    plan::{
        coerce_hours, DateRange, FormInputs, Holiday, PaySchedule, PlanningState,
        DEFAULT_HOLIDAY_HOURS, DEFAULT_HOLIDAY_NAME, DEFAULT_RANGE_HOURS,
    },
};

/// Versionless snapshot of a planning session, mirroring `PlanningState`
/// minus the transient selection and balances. Every field is optional on
/// the way in: missing data falls back to the in-memory default, and a
/// payload that fails to parse at the top level is discarded wholesale
/// rather than partially applied.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Snapshot {
    pub inputs: Option<InputsSnapshot>,
    pub view_month: Option<NaiveDate>,
    pub ranges: Option<Vec<RangeSnapshot>>,
    pub holidays: Option<Vec<HolidaySnapshot>>,
    pub holidays_initialized: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InputsSnapshot {
    pub pto_today: Option<f64>,
    pub accrual_rate: Option<f64>,
    pub schedule: Option<PaySchedule>,
    pub next_pay_date: Option<NaiveDate>,
    pub include_weekends: Option<bool>,
    pub nine_eighty: Option<bool>,
    pub nine_eighty_anchor: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RangeSnapshot {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub default_hours: Option<f64>,
    pub overrides: Option<BTreeMap<NaiveDate, f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HolidaySnapshot {
    pub id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub name: Option<String>,
    pub hours: Option<f64>,
}

impl Snapshot {
    pub fn capture(state: &PlanningState) -> Self {
        Self {
            inputs: Some(InputsSnapshot::capture(&state.inputs)),
            view_month: Some(state.view_month),
            ranges: Some(state.ranges.iter().map(RangeSnapshot::capture).collect()),
            holidays: Some(state.holidays.iter().map(HolidaySnapshot::capture).collect()),
            holidays_initialized: Some(state.holidays_initialized),
        }
    }

    pub fn encode(&self) -> Result<String, PlanError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a raw snapshot, discarding it wholesale on malformed JSON.
    pub fn decode(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(snapshot) => Some(snapshot),
            Err(error) => {
                tracing::warn!(%error, "discarding unparseable snapshot");
                None
            }
        }
    }

    /// Rebuilds a planning state, defaulting every missing field. The
    /// selection resets to `Empty` and balances to empty; neither is
    /// persisted. A snapshot that carries a holidays array implies the set
    /// is user-owned, unless the explicit flag says otherwise.
    pub fn restore(self, today: NaiveDate) -> PlanningState {
        let mut state = PlanningState::new(self.view_month.unwrap_or(today));
        if let Some(inputs) = self.inputs {
            state.inputs = inputs.restore();
        }
        if let Some(ranges) = self.ranges {
            state.ranges = ranges.into_iter().filter_map(RangeSnapshot::restore).collect();
        }
        if let Some(holidays) = self.holidays {
            state.holidays = holidays
                .into_iter()
                .filter_map(HolidaySnapshot::restore)
                .collect();
            state.holidays_initialized = true;
        }
        if let Some(flag) = self.holidays_initialized {
            state.holidays_initialized = flag;
        }
        state
    }
}

impl InputsSnapshot {
    fn capture(inputs: &FormInputs) -> Self {
        Self {
            pto_today: Some(inputs.pto_today),
            accrual_rate: Some(inputs.accrual_rate),
            schedule: Some(inputs.schedule),
            next_pay_date: inputs.next_pay_date,
            include_weekends: Some(inputs.include_weekends),
            nine_eighty: Some(inputs.nine_eighty),
            nine_eighty_anchor: inputs.nine_eighty_anchor,
        }
    }

    fn restore(self) -> FormInputs {
        let defaults = FormInputs::default();
        FormInputs {
            pto_today: coerce_number(self.pto_today, defaults.pto_today),
            accrual_rate: coerce_number(self.accrual_rate, defaults.accrual_rate),
            schedule: self.schedule.unwrap_or(defaults.schedule),
            next_pay_date: self.next_pay_date,
            include_weekends: self.include_weekends.unwrap_or(defaults.include_weekends),
            nine_eighty: self.nine_eighty.unwrap_or(defaults.nine_eighty),
            nine_eighty_anchor: self.nine_eighty_anchor,
        }
    }
}

impl RangeSnapshot {
    fn capture(range: &DateRange) -> Self {
        Self {
            start: Some(range.start),
            end: Some(range.end),
            default_hours: Some(range.default_hours),
            overrides: Some(range.overrides.clone()),
        }
    }

    /// Drops ranges missing a bound or with inverted bounds; override keys
    /// outside the bounds are dropped to re-establish the invariant.
    fn restore(self) -> Option<DateRange> {
        let start = self.start?;
        let end = self.end?;
        if start > end {
            return None;
        }
        let mut range =
            DateRange::with_hours(start, end, self.default_hours.unwrap_or(DEFAULT_RANGE_HOURS));
        if let Some(overrides) = self.overrides {
            range.overrides = overrides
                .into_iter()
                .filter(|(date, _)| range.contains(*date))
                .map(|(date, hours)| (date, coerce_hours(hours)))
                .collect();
        }
        Some(range)
    }
}

impl HolidaySnapshot {
    fn capture(holiday: &Holiday) -> Self {
        Self {
            id: Some(holiday.id),
            date: Some(holiday.date),
            name: Some(holiday.name.clone()),
            hours: Some(holiday.hours),
        }
    }

    /// Entries without a date are dropped; everything else defaults.
    fn restore(self) -> Option<Holiday> {
        let date = self.date?;
        Some(Holiday {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            date,
            name: self.name.unwrap_or_else(|| DEFAULT_HOLIDAY_NAME.to_string()),
            hours: coerce_hours(self.hours.unwrap_or(DEFAULT_HOLIDAY_HOURS)),
        })
    }
}

fn coerce_number(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        Some(_) => 0.0,
        None => fallback,
    }
}
