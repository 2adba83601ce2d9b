//! Everything that touches the remote forecasting engine: request
//! canonicalization, the HTTP seam, and the balance overlay applied to the
//! response.

pub mod client;
pub mod overlay;
pub mod request;

pub use client::{ForecastBackend, ForecastResponse, HttpForecastClient, SuggestedHoliday};
pub use request::{DayHours, ForecastRequest, HolidayEntry};
