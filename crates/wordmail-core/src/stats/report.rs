use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::review::{percent, round_to, ReviewState, SchedulerState};

/// Mastery level from which a word counts toward the mastery rate.
const SOLID_LEVEL: u32 = 3;
const RECENT_WORDS: usize = 5;
const DAILY_WINDOW_DAYS: i64 = 30;

/// A review entry together with its word list index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedWord {
    pub index: usize,
    #[serde(flatten)]
    pub state: ReviewState,
}

/// Words introduced on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Aggregate learning statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsReport {
    /// Words with a review entry
    pub total_learned: usize,
    /// Size of the word list
    pub total_words: usize,
    /// Sum of review counts over all words
    pub total_reviews: u64,
    /// Percentage of learned words at level 3 or above, one decimal
    pub mastery_rate: f64,
    /// Percentage of the word list learned, two decimals
    pub progress: f64,
    /// Consecutive days of activity ending today
    pub streak_days: usize,
    /// Words whose next review falls exactly on today
    pub today_review_count: usize,
    /// Number of words at each mastery level
    pub mastery_distribution: BTreeMap<u32, usize>,
    /// Most recently reviewed words, newest first
    pub recent_words: Vec<IndexedWord>,
    /// New words per day over the last 30 days, oldest first
    pub daily_stats: Vec<DailyCount>,
    pub last_update: Option<NaiveDateTime>,
}

impl StatisticsReport {
    pub fn compute(state: &SchedulerState, total_words: usize, today: NaiveDate) -> Self {
        let total_learned = state.words.len();
        let total_reviews = state
            .words
            .values()
            .map(|s| u64::from(s.review_count))
            .sum();

        let mut mastery_distribution = BTreeMap::new();
        for s in state.words.values() {
            *mastery_distribution.entry(s.mastery_level).or_insert(0) += 1;
        }

        let solid = state
            .words
            .values()
            .filter(|s| s.mastery_level >= SOLID_LEVEL)
            .count();
        let mastery_rate = if total_learned == 0 {
            0.0
        } else {
            round_to(solid as f64 / total_learned as f64 * 100.0, 1)
        };

        let today_review_count = state
            .words
            .values()
            .filter(|s| s.next_review == today)
            .count();

        let mut recent_words = word_list(state);
        recent_words.truncate(RECENT_WORDS);

        Self {
            total_learned,
            total_words,
            total_reviews,
            mastery_rate,
            progress: percent(total_learned, total_words),
            streak_days: streak_days(state, today),
            today_review_count,
            mastery_distribution,
            recent_words,
            daily_stats: daily_stats(state, today),
            last_update: state.last_update,
        }
    }
}

/// Every reviewed word, most recently reviewed first. Ties keep index order.
pub fn word_list(state: &SchedulerState) -> Vec<IndexedWord> {
    let mut words: Vec<IndexedWord> = state
        .words
        .iter()
        .map(|(&index, s)| IndexedWord {
            index,
            state: s.clone(),
        })
        .collect();
    words.sort_by(|a, b| b.state.last_review.cmp(&a.state.last_review));
    words
}

fn streak_days(state: &SchedulerState, today: NaiveDate) -> usize {
    let active: BTreeSet<NaiveDate> = state
        .words
        .values()
        .flat_map(|s| [s.first_learned, s.last_review])
        .collect();

    active
        .iter()
        .rev()
        .enumerate()
        .take_while(|(i, date)| **date == today - Duration::days(*i as i64))
        .count()
}

fn daily_stats(state: &SchedulerState, today: NaiveDate) -> Vec<DailyCount> {
    (0..DAILY_WINDOW_DAYS)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let count = state
                .words
                .values()
                .filter(|s| s.first_learned == date)
                .count();
            DailyCount { date, count }
        })
        .collect()
}
