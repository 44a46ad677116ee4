//! Spaced-repetition review scheduling.
//!
//! Words are keyed by their position in the word list. Each introduced word
//! carries a [`ReviewState`]; the [`ReviewScheduler`] decides which words are
//! due, introduces new ones, and moves a word along the interval table each
//! time it is reviewed.

mod scheduler;
mod state;
mod store;

pub use scheduler::{ProgressSummary, ReviewScheduler, SelectedWord, Selection};
pub use state::{ReviewState, SchedulerState};
pub use store::StateStore;

pub(crate) use scheduler::{percent, round_to};

use crate::error::ValidationError;

/// Ebbinghaus-style review intervals in days, indexed by mastery level.
pub const DEFAULT_REVIEW_INTERVALS: [u32; 6] = [1, 2, 4, 7, 15, 30];

/// Mastery level at which a word counts as mastered in progress reports.
///
/// Fixed rather than derived from the interval table; it equals `K-1` only
/// for the default six-entry table.
pub const MASTERED_LEVEL: u32 = 5;

/// Days until the next review once mastery runs past the interval table.
pub const EXHAUSTED_INTERVAL_DAYS: i64 = 30;

/// Current on-disk schema version of [`SchedulerState`].
pub const STATE_VERSION: u32 = 1;

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Review intervals in days. Must be non-empty, positive and strictly
    /// increasing.
    pub intervals: Vec<u32>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            intervals: DEFAULT_REVIEW_INTERVALS.to_vec(),
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.intervals.is_empty() {
            return Err(ValidationError::EmptyCollection("review intervals".into()));
        }
        if self.intervals[0] == 0 {
            return Err(ValidationError::InvalidValue {
                field: "intervals".into(),
                message: "intervals must be at least one day".into(),
            });
        }
        if self.intervals.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ValidationError::InvalidValue {
                field: "intervals".into(),
                message: format!("intervals must be strictly increasing: {:?}", self.intervals),
            });
        }
        Ok(())
    }

    /// Highest reachable mastery level (`K-1`).
    pub fn max_level(&self) -> u32 {
        self.intervals.len().saturating_sub(1) as u32
    }
}
