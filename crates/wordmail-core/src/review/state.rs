//! Persisted review state.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::STATE_VERSION;

/// Review history of one introduced word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewState {
    /// The word text at introduction time. Informational; the key is the index.
    #[serde(default)]
    pub word: String,
    pub first_learned: NaiveDate,
    pub review_count: u32,
    pub last_review: NaiveDate,
    pub next_review: NaiveDate,
    pub mastery_level: u32,
}

impl ReviewState {
    /// State for a word introduced today.
    pub fn introduced(word: impl Into<String>, today: NaiveDate, first_interval_days: u32) -> Self {
        Self {
            word: word.into(),
            first_learned: today,
            review_count: 0,
            last_review: today,
            next_review: today + Duration::days(i64::from(first_interval_days)),
            mastery_level: 0,
        }
    }

    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_review <= today
    }
}

/// Everything the scheduler persists between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerState {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Review state keyed by word list index.
    #[serde(default)]
    pub words: BTreeMap<usize, ReviewState>,
    /// Every index ever introduced as a new word.
    #[serde(default)]
    pub used_indices: BTreeSet<usize>,
    #[serde(default)]
    pub last_update: Option<NaiveDateTime>,
}

fn default_version() -> u32 {
    STATE_VERSION
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            words: BTreeMap::new(),
            used_indices: BTreeSet::new(),
            last_update: None,
        }
    }
}

impl SchedulerState {
    /// Forget all history.
    pub fn clear(&mut self) {
        self.words.clear();
        self.used_indices.clear();
    }

    /// Restore the state invariants after loading a file that may have been
    /// edited by hand or written by an older tool. Returns the number of
    /// repairs made.
    pub fn repair(&mut self, max_level: u32) -> usize {
        let mut repairs = 0;

        for (index, state) in self.words.iter_mut() {
            if self.used_indices.insert(*index) {
                tracing::warn!(index, "state entry was missing from used_indices");
                repairs += 1;
            }
            if state.mastery_level > max_level {
                tracing::warn!(
                    index,
                    level = state.mastery_level,
                    max_level,
                    "clamping mastery level"
                );
                state.mastery_level = max_level;
                repairs += 1;
            }
            if state.next_review < state.last_review {
                tracing::warn!(index, "next review predates last review");
                state.next_review = state.last_review;
                repairs += 1;
            }
        }

        repairs
    }
}
