//! File-backed persistence for the planning snapshot. Writes are atomic
//! (staged to a temp file, then renamed) so a failed save never corrupts
//! the previous snapshot.

pub mod snapshot;

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;

use crate::{
    errors::PlanError,
    plan::PlanningState,
    utils::{app_data_dir, ensure_dir},
};

pub use snapshot::Snapshot;

const SNAPSHOT_FILE: &str = "plan.json";

pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store rooted at the application data directory.
    pub fn open_default() -> Result<Self, PlanError> {
        let dir = app_data_dir();
        ensure_dir(&dir)?;
        Ok(Self::new(dir.join(SNAPSHOT_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, state: &PlanningState) -> Result<(), PlanError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = Snapshot::capture(state).encode()?;
        write_atomic(&self.path, &json)
    }

    /// Loads the stored plan. A missing file is an empty plan, not an error;
    /// a corrupt file is discarded wholesale.
    pub fn load(&self, today: NaiveDate) -> Result<Option<PlanningState>, PlanError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(Snapshot::decode(&raw).map(|snapshot| snapshot.restore(today)))
    }
}

fn write_atomic(path: &Path, data: &str) -> Result<(), PlanError> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, data)?;
    fs::rename(tmp, path)?;
    Ok(())
}
