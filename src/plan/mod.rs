//! Planning domain: the selection state machine, the committed ledger of
//! ranges and holidays, and the aggregate state the rest of the crate
//! operates on.

pub mod holiday;
pub mod range;
pub mod selection;
pub mod state;

pub use holiday::{Holiday, HolidayPatch, DEFAULT_HOLIDAY_HOURS, DEFAULT_HOLIDAY_NAME};
pub use range::{coerce_hours, DateRange, DEFAULT_RANGE_HOURS};
pub use selection::Selection;
pub use state::{FormInputs, PaySchedule, PlanningState};
