#![doc(test(attr(deny(warnings))))]

//! PTO Core turns raw calendar interactions into a committed paid-time-off
//! ledger and canonicalizes it into forecast requests whose per-date balance
//! responses overlay back onto the calendar.

pub mod dates;
pub mod errors;
pub mod forecast;
pub mod plan;
pub mod session;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("PTO Core tracing initialized.");
    });
}
