use chrono::NaiveDate;

/// Transient two-click range picker. Never persisted; a reload always starts
/// back at `Empty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Empty,
    Pending(NaiveDate),
    Committed {
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl Selection {
    /// Feeds one calendar-day click into the picker. From `Empty` or
    /// `Committed` this starts a fresh pick; from `Pending` it commits the
    /// pair, swapping so that start <= end. Past-day clicks must be rejected
    /// by the caller before reaching here.
    pub fn select(&mut self, date: NaiveDate) {
        *self = match *self {
            Selection::Empty | Selection::Committed { .. } => Selection::Pending(date),
            Selection::Pending(start) if date < start => Selection::Committed { start: date, end: start },
            Selection::Pending(start) => Selection::Committed { start, end: date },
        };
    }

    pub fn clear(&mut self) {
        *self = Selection::Empty;
    }

    /// First clicked day, whether or not the pick is committed yet.
    pub fn start(&self) -> Option<NaiveDate> {
        match *self {
            Selection::Empty => None,
            Selection::Pending(start) | Selection::Committed { start, .. } => Some(start),
        }
    }

    /// Both bounds, only once the pick is committed.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match *self {
            Selection::Committed { start, end } => Some((start, end)),
            _ => None,
        }
    }

    /// Whether `date` falls inside a committed pick, for highlighting.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Selection::Committed { start, end } => start <= date && date <= end,
            _ => false,
        }
    }
}
