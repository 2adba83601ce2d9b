use chrono::{Datelike, NaiveDate, Weekday};
use uuid::Uuid;

use crate::plan::{coerce_hours, HolidayPatch, PaySchedule, PlanningState};

/// One discrete user action. Every mutation of the planning state flows
/// through [`apply_command`]; there is no other mutation surface, which
/// keeps the update path deterministic and unit-testable without any UI.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanCommand {
    /// A calendar-day click. Days before today are ignored.
    SelectDay(NaiveDate),
    /// Confirms the committed selection into the ledger as a new range.
    ConfirmRange,
    /// Declares a holiday on the selection's start day.
    ConfirmHoliday,
    RemoveRange(usize),
    /// Raw text from the per-day hours field; coerced at this boundary.
    SetOverride {
        range: usize,
        date: NaiveDate,
        hours: String,
    },
    RemoveHoliday(Uuid),
    EditHoliday {
        id: Uuid,
        patch: HolidayPatch,
    },
    SetPtoToday(String),
    SetAccrualRate(String),
    SetSchedule(PaySchedule),
    SetNextPayDate(Option<NaiveDate>),
    SetIncludeWeekends(bool),
    SetNineEighty(bool),
    SetNineEightyAnchor(Option<NaiveDate>),
    /// Moves the two-month view window by whole months.
    ShiftView(i32),
}

/// What the caller must do after a command: write the snapshot, refresh the
/// forecast, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Effects {
    pub persist: bool,
    pub forecast: bool,
}

impl Effects {
    pub const NONE: Effects = Effects {
        persist: false,
        forecast: false,
    };
    pub const ALL: Effects = Effects {
        persist: true,
        forecast: true,
    };
}

/// The single state-update function. Invalid input never escapes as an
/// error: numeric text falls back to 0, out-of-domain references and
/// duplicate holidays are logged no-ops.
pub fn apply_command(state: &mut PlanningState, today: NaiveDate, command: PlanCommand) -> Effects {
    match command {
        PlanCommand::SelectDay(date) => {
            if date < today {
                return Effects::NONE;
            }
            state.selection.select(date);
            Effects::NONE
        }
        PlanCommand::ConfirmRange => match state.selection.bounds() {
            Some((start, end)) => {
                state.add_range(start, end);
                state.selection.clear();
                Effects::ALL
            }
            None => Effects::NONE,
        },
        PlanCommand::ConfirmHoliday => match state.selection.start() {
            Some(date) if state.add_holiday(date).is_some() => {
                state.selection.clear();
                Effects::ALL
            }
            _ => Effects::NONE,
        },
        PlanCommand::RemoveRange(index) => match state.remove_range(index) {
            Ok(_) => Effects::ALL,
            Err(error) => {
                tracing::warn!(%error, "remove_range ignored");
                Effects::NONE
            }
        },
        PlanCommand::SetOverride { range, date, hours } => {
            let parsed = coerce_hours(parse_number(&hours));
            match state.set_override(range, date, parsed) {
                Ok(()) => Effects::ALL,
                Err(error) => {
                    tracing::warn!(%error, "set_override ignored");
                    Effects::NONE
                }
            }
        }
        PlanCommand::RemoveHoliday(id) => {
            if state.remove_holiday(id) {
                Effects::ALL
            } else {
                Effects::NONE
            }
        }
        PlanCommand::EditHoliday { id, patch } => {
            if state.update_holiday(id, patch) {
                Effects::ALL
            } else {
                Effects::NONE
            }
        }
        PlanCommand::SetPtoToday(raw) => {
            state.inputs.pto_today = parse_number(&raw);
            Effects::ALL
        }
        PlanCommand::SetAccrualRate(raw) => {
            state.inputs.accrual_rate = parse_number(&raw);
            Effects::ALL
        }
        PlanCommand::SetSchedule(schedule) => {
            state.inputs.schedule = schedule;
            Effects::ALL
        }
        PlanCommand::SetNextPayDate(date) => {
            state.inputs.next_pay_date = date;
            Effects::ALL
        }
        PlanCommand::SetIncludeWeekends(value) => {
            state.inputs.include_weekends = value;
            Effects::ALL
        }
        PlanCommand::SetNineEighty(value) => {
            state.inputs.nine_eighty = value;
            Effects::ALL
        }
        PlanCommand::SetNineEightyAnchor(date) => {
            // The 9/80 cycle anchors on a Friday; anything else is rejected
            // and the field cleared, matching the form validation.
            state.inputs.nine_eighty_anchor = match date {
                Some(day) if day.weekday() == Weekday::Fri => Some(day),
                Some(day) => {
                    tracing::debug!(%day, "9/80 anchor must be a Friday; cleared");
                    None
                }
                None => None,
            };
            Effects::ALL
        }
        PlanCommand::ShiftView(months) => {
            state.set_view_month(crate::dates::add_months(state.view_month, months));
            Effects::ALL
        }
    }
}

/// Numeric coercion for raw form text: blank or unparseable becomes 0.
fn parse_number(raw: &str) -> f64 {
    let parsed: f64 = raw.trim().parse().unwrap_or(0.0);
    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}
