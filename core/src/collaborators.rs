use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use crate::error::CollaboratorError;
use crate::game::GameState;

/// Where the controller checkpoints the game.
pub trait Persistence {
    fn save_game(&mut self, state: &GameState) -> Result<(), CollaboratorError>;
}

/// Sums the salaries charged at each settlement.
pub trait Payroll {
    fn compute_monthly_salaries(&self, state: &GameState) -> Result<i64, CollaboratorError>;
}

/// Drives autonomous ticks. The controller keeps at most one interval live by always
/// calling `stop` before `start`.
pub trait TickTimer {
    fn start(&mut self, interval: Duration);
    fn stop(&mut self);

    /// Called between the days of a week advance so the host can catch up.
    fn yield_between_days(&mut self) {}
}

/// Checkpoints the whole [`GameState`] as pretty-printed JSON at one path. Each save
/// replaces the previous one.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the last checkpoint. A missing file is not an error.
    pub fn load_game(&self) -> Result<Option<GameState>, CollaboratorError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let reader = BufReader::new(File::open(&self.path)?);
        Ok(Some(serde_json::from_reader(reader)?))
    }
}

impl Persistence for JsonFileStore {
    fn save_game(&mut self, state: &GameState) -> Result<(), CollaboratorError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        // Write next to the target first so a failed save leaves the old file intact.
        let staging = self.path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&staging)?);
            serde_json::to_writer_pretty(&mut writer, state)?;
            writer.flush()?;
        }
        fs::rename(&staging, &self.path)?;
        info!(path = %self.path.display(), date = %state.date(), "game saved");
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPersistence;

impl Persistence for NoopPersistence {
    fn save_game(&mut self, _state: &GameState) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

/// Charges every active staff member's monthly salary.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaffPayroll;

impl Payroll for StaffPayroll {
    fn compute_monthly_salaries(&self, state: &GameState) -> Result<i64, CollaboratorError> {
        Ok(state.staff().iter().map(|member| member.monthly_salary).sum())
    }
}

/// Timer for hosts that only advance time manually.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTimer;

impl TickTimer for NullTimer {
    fn start(&mut self, _interval: Duration) {}

    fn stop(&mut self) {}
}
