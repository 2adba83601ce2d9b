use std::{cell::RefCell, collections::BTreeMap, collections::VecDeque, rc::Rc};

use chrono::NaiveDate;
use pto_core::{
    errors::PlanError,
    forecast::{ForecastBackend, ForecastRequest, ForecastResponse, SuggestedHoliday},
    plan::Selection,
    session::{Effects, PlanCommand, PlanSession},
    storage::SnapshotStore,
};
use tempfile::tempdir;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    day(2024, 6, 1)
}

fn balances_for(date: NaiveDate, value: f64) -> BTreeMap<NaiveDate, f64> {
    let mut balances = BTreeMap::new();
    balances.insert(date, value);
    balances
}

/// Scripted forecast backend: pops pre-seeded outcomes in order and records
/// every request it sees. Falls back to an empty success once the script
/// runs dry.
#[derive(Default)]
struct Script {
    responses: RefCell<VecDeque<Result<ForecastResponse, PlanError>>>,
    seen: RefCell<Vec<ForecastRequest>>,
}

impl Script {
    fn push(&self, outcome: Result<ForecastResponse, PlanError>) {
        self.responses.borrow_mut().push_back(outcome);
    }
}

struct SharedScript(Rc<Script>);

impl ForecastBackend for SharedScript {
    fn forecast(&self, request: &ForecastRequest) -> Result<ForecastResponse, PlanError> {
        self.0.seen.borrow_mut().push(request.clone());
        self.0
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(ForecastResponse::default()))
    }
}

fn scripted_session(store: Option<SnapshotStore>) -> (PlanSession, Rc<Script>) {
    let script = Rc::new(Script::default());
    let session = PlanSession::new(today(), store, Box::new(SharedScript(script.clone())));
    (session, script)
}

#[test]
fn confirm_range_commits_ledger_and_applies_balances() {
    let (mut session, script) = scripted_session(None);
    script.push(Ok(ForecastResponse {
        balances: balances_for(day(2024, 6, 10), 36.0),
        holidays: None,
    }));

    session.dispatch(PlanCommand::SelectDay(day(2024, 6, 10))).unwrap();
    session.dispatch(PlanCommand::SelectDay(day(2024, 6, 12))).unwrap();
    let effects = session.dispatch(PlanCommand::ConfirmRange).unwrap();

    assert_eq!(effects, Effects::ALL);
    assert_eq!(session.state().ranges.len(), 1);
    assert_eq!(session.state().selection, Selection::Empty);
    assert_eq!(session.state().balances.get(&day(2024, 6, 10)), Some(&36.0));

    let seen = script.seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].days.len(), 3);
}

#[test]
fn confirm_range_without_committed_selection_is_a_no_op() {
    let (mut session, script) = scripted_session(None);
    session.dispatch(PlanCommand::SelectDay(day(2024, 6, 10))).unwrap();
    let effects = session.dispatch(PlanCommand::ConfirmRange).unwrap();
    assert_eq!(effects, Effects::NONE);
    assert!(session.state().ranges.is_empty());
    assert!(script.seen.borrow().is_empty());
}

#[test]
fn clicks_before_today_are_ignored() {
    let (mut session, _script) = scripted_session(None);
    let effects = session.dispatch(PlanCommand::SelectDay(day(2024, 5, 31))).unwrap();
    assert_eq!(effects, Effects::NONE);
    assert_eq!(session.state().selection, Selection::Empty);
}

#[test]
fn duplicate_holiday_confirm_keeps_selection() {
    let (mut session, _script) = scripted_session(None);
    session.dispatch(PlanCommand::SelectDay(day(2024, 7, 4))).unwrap();
    session.dispatch(PlanCommand::ConfirmHoliday).unwrap();
    assert_eq!(session.state().holidays.len(), 1);

    session.dispatch(PlanCommand::SelectDay(day(2024, 7, 4))).unwrap();
    let effects = session.dispatch(PlanCommand::ConfirmHoliday).unwrap();
    assert_eq!(effects, Effects::NONE);
    assert_eq!(session.state().holidays.len(), 1);
    // The rejected confirm leaves the pick alone for the user to adjust.
    assert_eq!(session.state().selection, Selection::Pending(day(2024, 7, 4)));
}

#[test]
fn stale_forecast_completion_is_discarded() {
    let (mut session, _script) = scripted_session(None);
    let (first_seq, _first) = session.issue_forecast().unwrap();
    let (second_seq, _second) = session.issue_forecast().unwrap();
    assert!(second_seq > first_seq);

    session
        .apply_forecast(
            second_seq,
            Ok(ForecastResponse {
                balances: balances_for(day(2024, 6, 2), 40.0),
                holidays: None,
            }),
        )
        .unwrap();
    // The earlier request completes late; its payload must not win.
    session
        .apply_forecast(
            first_seq,
            Ok(ForecastResponse {
                balances: balances_for(day(2024, 6, 2), -99.0),
                holidays: None,
            }),
        )
        .unwrap();

    assert_eq!(session.state().balances.get(&day(2024, 6, 2)), Some(&40.0));
}

#[test]
fn transport_failure_clears_prior_balances() {
    let (mut session, script) = scripted_session(None);
    script.push(Ok(ForecastResponse {
        balances: balances_for(day(2024, 6, 2), 40.0),
        holidays: None,
    }));
    session.dispatch(PlanCommand::SetPtoToday("40".into())).unwrap();
    assert!(!session.state().balances.is_empty());

    script.push(Err(PlanError::InvalidRef("connection refused".into())));
    session.dispatch(PlanCommand::SetPtoToday("41".into())).unwrap();
    assert!(session.state().balances.is_empty());
}

#[test]
fn unmet_preconditions_skip_the_request_and_keep_balances() {
    let (mut session, script) = scripted_session(None);
    script.push(Ok(ForecastResponse {
        balances: balances_for(day(2024, 6, 2), 40.0),
        holidays: None,
    }));
    session.dispatch(PlanCommand::SetPtoToday("40".into())).unwrap();
    let calls_before = script.seen.borrow().len();

    session.dispatch(PlanCommand::SetNextPayDate(None)).unwrap();
    assert_eq!(script.seen.borrow().len(), calls_before);
    assert_eq!(session.state().balances.get(&day(2024, 6, 2)), Some(&40.0));
}

#[test]
fn blank_numeric_input_coerces_to_zero() {
    let (mut session, _script) = scripted_session(None);
    session.dispatch(PlanCommand::SetAccrualRate("  ".into())).unwrap();
    assert_eq!(session.state().inputs.accrual_rate, 0.0);
    session.dispatch(PlanCommand::SetAccrualRate("4.62".into())).unwrap();
    assert_eq!(session.state().inputs.accrual_rate, 4.62);
    session.dispatch(PlanCommand::SetAccrualRate("garbage".into())).unwrap();
    assert_eq!(session.state().inputs.accrual_rate, 0.0);
}

#[test]
fn non_friday_anchor_is_rejected() {
    let (mut session, _script) = scripted_session(None);
    // 2024-06-05 is a Wednesday.
    session
        .dispatch(PlanCommand::SetNineEightyAnchor(Some(day(2024, 6, 5))))
        .unwrap();
    assert!(session.state().inputs.nine_eighty_anchor.is_none());
    // 2024-06-07 is a Friday.
    session
        .dispatch(PlanCommand::SetNineEightyAnchor(Some(day(2024, 6, 7))))
        .unwrap();
    assert_eq!(
        session.state().inputs.nine_eighty_anchor,
        Some(day(2024, 6, 7))
    );
}

#[test]
fn suggestions_are_adopted_exactly_once() {
    let (mut session, script) = scripted_session(None);
    let suggestion = SuggestedHoliday {
        date: Some(day(2024, 7, 4)),
        name: Some("Independence Day".into()),
        hours: Some(8.0),
    };
    script.push(Ok(ForecastResponse {
        balances: BTreeMap::new(),
        holidays: Some(vec![suggestion.clone()]),
    }));
    session.dispatch(PlanCommand::SetPtoToday("40".into())).unwrap();
    assert!(session.state().holidays_initialized);
    assert_eq!(session.state().holidays.len(), 1);
    let adopted_id = session.state().holidays[0].id;

    script.push(Ok(ForecastResponse {
        balances: BTreeMap::new(),
        holidays: Some(vec![suggestion.clone(), suggestion]),
    }));
    session.dispatch(PlanCommand::SetPtoToday("41".into())).unwrap();
    assert_eq!(session.state().holidays.len(), 1);
    assert_eq!(session.state().holidays[0].id, adopted_id);
}

#[test]
fn session_persists_across_reload() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("plan.json");

    let (mut session, _script) = scripted_session(Some(SnapshotStore::new(path.clone())));
    session.dispatch(PlanCommand::SelectDay(day(2024, 6, 10))).unwrap();
    session.dispatch(PlanCommand::SelectDay(day(2024, 6, 12))).unwrap();
    session.dispatch(PlanCommand::ConfirmRange).unwrap();
    session.dispatch(PlanCommand::SetAccrualRate("4.62".into())).unwrap();
    session.dispatch(PlanCommand::ShiftView(1)).unwrap();

    let script = Rc::new(Script::default());
    let reloaded = PlanSession::load_or_default(
        today(),
        SnapshotStore::new(path),
        Box::new(SharedScript(script.clone())),
    )
    .unwrap();

    assert_eq!(reloaded.state().ranges.len(), 1);
    assert_eq!(reloaded.state().inputs.accrual_rate, 4.62);
    assert_eq!(reloaded.state().view_month, day(2024, 7, 1));
    assert_eq!(reloaded.state().selection, Selection::Empty);
    // The reload refreshed the forecast once against the restored state.
    assert_eq!(script.seen.borrow().len(), 1);
}

#[test]
fn nav_shifts_view_by_whole_months() {
    let (mut session, _script) = scripted_session(None);
    session.dispatch(PlanCommand::ShiftView(1)).unwrap();
    assert_eq!(session.state().view_month, day(2024, 7, 1));
    session.dispatch(PlanCommand::ShiftView(-2)).unwrap();
    assert_eq!(session.state().view_month, day(2024, 5, 1));
}
