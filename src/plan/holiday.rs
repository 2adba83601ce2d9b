use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::range::coerce_hours;

pub const DEFAULT_HOLIDAY_NAME: &str = "Holiday";
pub const DEFAULT_HOLIDAY_HOURS: f64 = 8.0;

/// A single-day hour credit, user-declared or adopted from a server
/// suggestion. The id is generated once and stays stable across edits;
/// deleted ids are never reused within a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Holiday {
    pub id: Uuid,
    pub date: NaiveDate,
    pub name: String,
    pub hours: f64,
}

impl Holiday {
    pub fn new(date: NaiveDate, name: impl Into<String>, hours: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            name: name.into(),
            hours: coerce_hours(hours),
        }
    }
}

/// In-place edit applied to one holiday field.
#[derive(Debug, Clone, PartialEq)]
pub enum HolidayPatch {
    Name(String),
    Date(NaiveDate),
    Hours(f64),
}
