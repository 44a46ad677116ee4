//! JSON file storage for [`SchedulerState`].
//!
//! Reading never fails: a missing or unreadable file starts a fresh history.
//! Writing replaces the whole file and reports every failure.

use std::path::{Path, PathBuf};

use super::{SchedulerState, STATE_VERSION};
use crate::error::StateError;

#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored state, or an empty one if the file is missing or
    /// cannot be understood. `max_level` is the highest mastery level the
    /// current interval table allows.
    pub fn load(&self, max_level: u32) -> SchedulerState {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %self.path.display(), "no review history found, starting fresh");
                return SchedulerState::default();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "review history unreadable, starting fresh");
                return SchedulerState::default();
            }
        };

        let mut state: SchedulerState = match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "review history is corrupt, starting fresh");
                return SchedulerState::default();
            }
        };

        if state.version > STATE_VERSION {
            tracing::warn!(
                path = %self.path.display(),
                version = state.version,
                supported = STATE_VERSION,
                "review history written by a newer version, starting fresh"
            );
            return SchedulerState::default();
        }
        state.version = STATE_VERSION;

        let repairs = state.repair(max_level);
        if repairs > 0 {
            tracing::warn!(repairs, "review history repaired on load");
        }

        tracing::debug!(
            words = state.words.len(),
            used = state.used_indices.len(),
            "review history loaded"
        );
        state
    }

    /// Overwrite the file with `state`.
    pub fn save(&self, state: &SchedulerState) -> Result<(), StateError> {
        let json = serde_json::to_string_pretty(state).map_err(StateError::Serialize)?;
        let write_failed = |source| StateError::WriteFailed {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_failed)?;
            }
        }
        std::fs::write(&self.path, json).map_err(write_failed)?;
        Ok(())
    }
}
