use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    dates,
    plan::{Holiday, PaySchedule, PlanningState},
};

/// One aggregated ledger entry: total planned hours debited on a date.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DayHours {
    pub date: NaiveDate,
    pub hours: f64,
}

/// Holiday as the request puts it on the wire.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HolidayEntry {
    pub date: NaiveDate,
    pub name: String,
    pub hours: f64,
}

impl From<&Holiday> for HolidayEntry {
    fn from(holiday: &Holiday) -> Self {
        Self {
            date: holiday.date,
            name: holiday.name.clone(),
            hours: holiday.hours,
        }
    }
}

/// Canonical `POST /forecast` payload. `Option` fields serialize to explicit
/// `null`; the endpoint distinguishes null from absent, so nothing is
/// skipped.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ForecastRequest {
    pub pto_today: f64,
    pub accrual_rate: f64,
    pub schedule: PaySchedule,
    pub next_pay_date: NaiveDate,
    pub end_date: NaiveDate,
    pub include_weekends: bool,
    pub nine_eighty: bool,
    pub nine_eighty_anchor: Option<NaiveDate>,
    pub days: Vec<DayHours>,
    pub holidays: Option<Vec<HolidayEntry>>,
    pub holiday_window_start: Option<NaiveDate>,
    pub holiday_window_end: Option<NaiveDate>,
}

/// Canonicalizes the planning state into a forecast request.
///
/// Declines (returns `None`) when no next pay date is set, or when the 9/80
/// toggle is on without an anchor Friday; the caller must then skip the
/// remote call entirely, leaving prior balances untouched.
pub fn build(state: &PlanningState) -> Option<ForecastRequest> {
    let next_pay_date = state.inputs.next_pay_date?;
    if state.inputs.nine_eighty && state.inputs.nine_eighty_anchor.is_none() {
        return None;
    }

    // Horizon runs through the end of the second displayed month.
    let end_date = dates::last_day_of_month(dates::add_months(state.view_month, 1));

    let (holidays, holiday_window_start, holiday_window_end) = if state.holidays_initialized {
        let entries = state.holidays.iter().map(HolidayEntry::from).collect();
        (Some(entries), None, None)
    } else {
        let (window_start, window_end) = dates::year_bounds(state.view_month);
        (None, Some(window_start), Some(window_end))
    };

    let anchor = if state.inputs.nine_eighty {
        state.inputs.nine_eighty_anchor
    } else {
        None
    };

    Some(ForecastRequest {
        pto_today: state.inputs.pto_today,
        accrual_rate: state.inputs.accrual_rate,
        schedule: state.inputs.schedule,
        next_pay_date,
        end_date,
        include_weekends: state.inputs.include_weekends,
        nine_eighty: state.inputs.nine_eighty,
        nine_eighty_anchor: anchor,
        days: aggregate_days(state),
        holidays,
        holiday_window_start,
        holiday_window_end,
    })
}

/// Accumulates effective hours per date across every range. Every day a
/// range touches gets an entry, an explicit 0 override included; days
/// covered by overlapping ranges sum their contributions.
fn aggregate_days(state: &PlanningState) -> Vec<DayHours> {
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for range in &state.ranges {
        for date in range.days() {
            *totals.entry(date).or_insert(0.0) += range.effective_hours(date);
        }
    }
    totals
        .into_iter()
        .map(|(date, hours)| DayHours { date, hours })
        .collect()
}
