use crate::{errors::PlanError, plan::PlanningState};

use super::client::{ForecastResponse, SuggestedHoliday};

/// Merges a forecast outcome onto the planning state.
///
/// Success replaces the balance map wholesale; stale entries are never
/// retained. While holidays are still server-suggested territory, a
/// suggestion list in the response becomes the initial holiday set;
/// date-less suggestions are dropped, not fatal. Any failure clears the
/// balances so the calendar shows nothing computed rather than stale
/// figures.
pub fn apply(state: &mut PlanningState, outcome: Result<ForecastResponse, PlanError>) {
    match outcome {
        Ok(response) => {
            state.balances = response.balances;
            if !state.holidays_initialized {
                if let Some(suggestions) = response.holidays {
                    let adopted = suggestions
                        .into_iter()
                        .filter_map(SuggestedHoliday::normalize)
                        .collect();
                    state.adopt_holidays(adopted);
                }
            }
        }
        Err(error) => {
            tracing::warn!(%error, "forecast failed; clearing balances");
            state.balances.clear();
        }
    }
}
