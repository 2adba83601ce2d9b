//! The explicit session context: one `PlanSession` owns the planning state,
//! the snapshot store, and the forecast backend. All mutation goes through
//! [`PlanSession::dispatch`]; persistence completes before dispatch returns,
//! so disk state always matches memory at save time.

pub mod command;

use chrono::{Duration, NaiveDate};

use crate::{
    errors::PlanError,
    forecast::{self, ForecastBackend, ForecastRequest, ForecastResponse},
    plan::PlanningState,
    storage::SnapshotStore,
};

pub use command::{apply_command, Effects, PlanCommand};

const NEXT_PAY_SEED_DAYS: i64 = 14;

pub struct PlanSession {
    state: PlanningState,
    today: NaiveDate,
    store: Option<SnapshotStore>,
    backend: Box<dyn ForecastBackend>,
    issued_seq: u64,
    applied_seq: u64,
}

impl PlanSession {
    /// Fresh session with an empty plan viewing the current month.
    pub fn new(
        today: NaiveDate,
        store: Option<SnapshotStore>,
        backend: Box<dyn ForecastBackend>,
    ) -> Self {
        let mut state = PlanningState::new(today);
        seed_next_pay_date(&mut state, today);
        Self {
            state,
            today,
            store,
            backend,
            issued_seq: 0,
            applied_seq: 0,
        }
    }

    /// Restores the stored plan when a valid snapshot exists, otherwise
    /// starts empty. A stored next pay date wins over the seeded one.
    pub fn load_or_default(
        today: NaiveDate,
        store: SnapshotStore,
        backend: Box<dyn ForecastBackend>,
    ) -> Result<Self, PlanError> {
        let mut session = match store.load(today)? {
            Some(mut state) => {
                seed_next_pay_date(&mut state, today);
                Self {
                    state,
                    today,
                    store: Some(store),
                    backend,
                    issued_seq: 0,
                    applied_seq: 0,
                }
            }
            None => Self::new(today, Some(store), backend),
        };
        session.refresh()?;
        Ok(session)
    }

    pub fn state(&self) -> &PlanningState {
        &self.state
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Applies one command, then runs its effects: snapshot write first,
    /// forecast refresh second. Forecast failures are absorbed into the
    /// overlay (balances cleared); only persistence errors propagate.
    pub fn dispatch(&mut self, command: PlanCommand) -> Result<Effects, PlanError> {
        let effects = apply_command(&mut self.state, self.today, command);
        if effects.persist {
            self.persist()?;
        }
        if effects.forecast {
            self.refresh()?;
        }
        Ok(effects)
    }

    /// Builds the next outbound request, tagging it with a fresh sequence
    /// number. `None` when the builder's preconditions are unmet; prior
    /// balances stay untouched in that case.
    pub fn issue_forecast(&mut self) -> Option<(u64, ForecastRequest)> {
        let request = forecast::request::build(&self.state)?;
        self.issued_seq += 1;
        Some((self.issued_seq, request))
    }

    /// Applies a completed forecast attempt. Completions older than the
    /// newest already applied are discarded, so a slow early request can
    /// never overwrite the result of a later one.
    pub fn apply_forecast(
        &mut self,
        seq: u64,
        outcome: Result<ForecastResponse, PlanError>,
    ) -> Result<(), PlanError> {
        if seq <= self.applied_seq {
            tracing::debug!(seq, applied = self.applied_seq, "stale forecast dropped");
            return Ok(());
        }
        self.applied_seq = seq;
        forecast::overlay::apply(&mut self.state, outcome);
        self.persist()
    }

    /// Builds, sends, and applies one forecast round trip. Returns whether a
    /// request was actually issued.
    pub fn refresh(&mut self) -> Result<bool, PlanError> {
        let Some((seq, request)) = self.issue_forecast() else {
            return Ok(false);
        };
        let outcome = self.backend.forecast(&request);
        self.apply_forecast(seq, outcome)?;
        Ok(true)
    }

    fn persist(&self) -> Result<(), PlanError> {
        if let Some(store) = &self.store {
            store.save(&self.state)?;
        }
        Ok(())
    }
}

/// The original seeds the next pay date two weeks out when the user has not
/// picked one yet.
fn seed_next_pay_date(state: &mut PlanningState, today: NaiveDate) {
    if state.inputs.next_pay_date.is_none() {
        state.inputs.next_pay_date = Some(today + Duration::days(NEXT_PAY_SEED_DAYS));
    }
}
