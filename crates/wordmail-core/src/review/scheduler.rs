//! Daily word selection and review bookkeeping.
//!
//! A run looks like:
//!
//! 1. [`ReviewScheduler::open`] loads the history (or starts fresh).
//! 2. [`ReviewScheduler::select_words`] picks due reviews and new words. New
//!    words are recorded as introduced immediately.
//! 3. After delivery, [`ReviewScheduler::mark_reviewed`] advances each review.
//! 4. [`ReviewScheduler::persist`] rewrites the history file.
//!
//! Nothing is written before step 4, so a run that fails halfway leaves the
//! previous history untouched.

use chrono::{Duration, Local, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{
    ReviewState, SchedulerConfig, SchedulerState, StateStore, EXHAUSTED_INTERVAL_DAYS,
    MASTERED_LEVEL,
};
use crate::corpus::WordRecord;
use crate::error::{StateError, ValidationError};

/// A word chosen for today, either new or due for review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedWord {
    #[serde(flatten)]
    pub record: WordRecord,
    pub index: usize,
    pub is_review: bool,
    /// Present for review words only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    /// Present for review words only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mastery_level: Option<u32>,
}

/// Result of [`ReviewScheduler::select_words`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub new_words: Vec<SelectedWord>,
    pub review_words: Vec<SelectedWord>,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.new_words.len() + self.review_words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// New words first, then reviews.
    pub fn into_words(self) -> Vec<SelectedWord> {
        let mut words = self.new_words;
        words.extend(self.review_words);
        words
    }
}

/// Learning progress shown in the daily mail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub total: usize,
    pub learned: usize,
    pub mastered: usize,
    pub progress_percent: f64,
    pub mastery_percent: f64,
}

impl ProgressSummary {
    /// Learned words are every index ever introduced; mastered words have
    /// reached [`MASTERED_LEVEL`].
    pub fn from_state(state: &SchedulerState, total_words: usize) -> Self {
        let learned = state.used_indices.len();
        let mastered = state
            .words
            .values()
            .filter(|s| s.mastery_level >= MASTERED_LEVEL)
            .count();

        Self {
            total: total_words,
            learned,
            mastered,
            progress_percent: percent(learned, total_words),
            mastery_percent: percent(mastered, learned),
        }
    }
}

/// Spaced-repetition scheduler over a positional word list.
pub struct ReviewScheduler<R = StdRng> {
    config: SchedulerConfig,
    store: StateStore,
    state: SchedulerState,
    rng: R,
    today: NaiveDate,
}

impl ReviewScheduler<StdRng> {
    /// Load history from `path` with an entropy-seeded random source.
    pub fn open(path: impl Into<PathBuf>, config: SchedulerConfig) -> Result<Self, ValidationError> {
        Self::with_rng(StateStore::new(path), config, StdRng::from_entropy())
    }
}

impl<R: Rng> ReviewScheduler<R> {
    /// Load history through `store`, drawing randomness from `rng`.
    pub fn with_rng(
        store: StateStore,
        config: SchedulerConfig,
        rng: R,
    ) -> Result<Self, ValidationError> {
        config.validate()?;
        let state = store.load(config.max_level());
        Ok(Self {
            config,
            store,
            state,
            rng,
            today: Local::now().date_naive(),
        })
    }

    /// Use `today` as the current date instead of the local clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    /// Words whose next review date has arrived, in no particular order.
    /// Entries pointing past the end of the word list are ignored.
    pub fn due_review_words(&self, corpus: &[WordRecord]) -> Vec<SelectedWord> {
        self.state
            .words
            .iter()
            .filter(|(_, state)| state.is_due(self.today))
            .filter_map(|(&index, state)| {
                let record = corpus.get(index)?;
                Some(SelectedWord {
                    record: record.clone(),
                    index,
                    is_review: true,
                    review_count: Some(state.review_count),
                    mastery_level: Some(state.mastery_level),
                })
            })
            .collect()
    }

    /// Introduce up to `count` words that have never been introduced.
    ///
    /// When fewer than `count` candidates remain, the whole history is
    /// cleared and the full word list becomes the candidate pool again.
    pub fn select_new_words(&mut self, corpus: &[WordRecord], count: usize) -> Vec<SelectedWord> {
        let mut available: Vec<usize> = (0..corpus.len())
            .filter(|i| !self.state.used_indices.contains(i))
            .collect();

        if available.len() < count {
            tracing::warn!(
                remaining = available.len(),
                requested = count,
                introduced = self.state.used_indices.len(),
                corpus = corpus.len(),
                "word list exhausted, resetting all review history"
            );
            self.state.clear();
            available = (0..corpus.len()).collect();
        }

        let take = count.min(available.len());
        let picked: Vec<usize> = available
            .choose_multiple(&mut self.rng, take)
            .copied()
            .collect();

        let first_interval = self.config.intervals[0];
        picked
            .into_iter()
            .map(|index| {
                let record = corpus[index].clone();
                self.state.words.insert(
                    index,
                    ReviewState::introduced(record.word.clone(), self.today, first_interval),
                );
                self.state.used_indices.insert(index);
                SelectedWord {
                    record,
                    index,
                    is_review: false,
                    review_count: None,
                    mastery_level: None,
                }
            })
            .collect()
    }

    /// Pick today's words. A shortfall of due reviews is made up with extra
    /// new words so the total stays at `new_count + review_count` whenever
    /// the word list allows it.
    pub fn select_words(
        &mut self,
        corpus: &[WordRecord],
        new_count: usize,
        review_count: usize,
    ) -> Selection {
        let mut review_words = self.due_review_words(corpus);
        if review_words.len() > review_count {
            review_words.shuffle(&mut self.rng);
            review_words.truncate(review_count);
        }

        let actual_new = new_count + (review_count - review_words.len());
        let new_words = self.select_new_words(corpus, actual_new);

        tracing::info!(
            new = new_words.len(),
            review = review_words.len(),
            backfill = actual_new - new_count,
            "words selected"
        );

        Selection {
            new_words,
            review_words,
        }
    }

    /// Record a review of `index` today. Returns `false` (and changes
    /// nothing) if the word was never introduced.
    pub fn mark_reviewed(&mut self, index: usize) -> bool {
        let intervals = &self.config.intervals;
        let Some(state) = self.state.words.get_mut(&index) else {
            return false;
        };

        state.review_count += 1;
        state.last_review = self.today;
        state.mastery_level = state.review_count.min(self.config.max_level());

        let level = state.mastery_level as usize;
        let days = if level < intervals.len() {
            i64::from(intervals[level])
        } else {
            EXHAUSTED_INTERVAL_DAYS
        };
        state.next_review = self.today + Duration::days(days);

        tracing::debug!(
            index,
            level = state.mastery_level,
            next = %state.next_review,
            "word reviewed"
        );
        true
    }

    pub fn progress(&self, total_words: usize) -> ProgressSummary {
        ProgressSummary::from_state(&self.state, total_words)
    }

    /// Forget all history. Takes effect on disk at the next [`persist`].
    ///
    /// [`persist`]: ReviewScheduler::persist
    pub fn reset(&mut self) {
        tracing::warn!(
            introduced = self.state.used_indices.len(),
            "review history cleared"
        );
        self.state.clear();
    }

    /// Write the full state to disk, replacing the previous file.
    pub fn persist(&mut self) -> Result<(), StateError> {
        self.state.last_update = Some(Local::now().naive_local());
        self.store.save(&self.state)?;
        tracing::info!(
            path = %self.store.path().display(),
            words = self.state.words.len(),
            "review history saved"
        );
        Ok(())
    }
}

/// `part / whole * 100` rounded to two decimals, 0 for an empty whole.
pub(crate) fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_to(part as f64 / whole as f64 * 100.0, 2)
}

/// Ties go to the even neighbour.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
