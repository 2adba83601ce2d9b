use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    errors::PlanError,
    plan::{Holiday, DEFAULT_HOLIDAY_HOURS, DEFAULT_HOLIDAY_NAME},
};

use super::request::ForecastRequest;

/// Forecast endpoint response. Absent fields deserialize to their empty
/// defaults; only a body that fails to parse altogether surfaces as a
/// transport failure.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ForecastResponse {
    pub balances: BTreeMap<NaiveDate, f64>,
    pub holidays: Option<Vec<SuggestedHoliday>>,
}

/// One server-suggested holiday. Every field is optional on the wire so a
/// bad entry never rejects the body it arrived in; entries without a date
/// are dropped at adoption, everything else defaults, mirroring how stored
/// holidays are restored.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SuggestedHoliday {
    pub date: Option<NaiveDate>,
    pub name: Option<String>,
    pub hours: Option<f64>,
}

impl SuggestedHoliday {
    pub fn normalize(self) -> Option<Holiday> {
        let date = self.date?;
        Some(Holiday::new(
            date,
            self.name.unwrap_or_else(|| DEFAULT_HOLIDAY_NAME.to_string()),
            self.hours.unwrap_or(DEFAULT_HOLIDAY_HOURS),
        ))
    }
}

/// Seam between the planner and the remote forecasting engine. Tests (and
/// embedders with their own transport) substitute their own implementation.
pub trait ForecastBackend {
    fn forecast(&self, request: &ForecastRequest) -> Result<ForecastResponse, PlanError>;
}

/// Blocking HTTP client posting the JSON payload to `{base_url}/forecast`.
/// No timeout and no retry: a failed attempt is terminal and shows up as an
/// emptied balance overlay.
pub struct HttpForecastClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl HttpForecastClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, PlanError> {
        let http = reqwest::blocking::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

impl ForecastBackend for HttpForecastClient {
    fn forecast(&self, request: &ForecastRequest) -> Result<ForecastResponse, PlanError> {
        let url = format!("{}/forecast", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(url)
            .json(request)
            .send()?
            .error_for_status()?;
        Ok(response.json()?)
    }
}
