//! Property tests for the review scheduler.
//!
//! Each case simulates a run of consecutive days against a fresh history,
//! reviewing every delivered review word, and checks the selection and
//! state invariants after every day.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use std::collections::HashSet;
use tempfile::TempDir;
use wordmail_core::{ReviewScheduler, SchedulerConfig, StateStore, WordRecord};

fn corpus(n: usize) -> Vec<WordRecord> {
    (0..n)
        .map(|i| WordRecord::new(format!("w{i}"), "", format!("d{i}")))
        .collect()
}

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
}

fn scheduler(dir: &TempDir, seed: u64) -> ReviewScheduler<Pcg64> {
    ReviewScheduler::with_rng(
        StateStore::new(dir.path().join("history.json")),
        SchedulerConfig::default(),
        Pcg64::seed_from_u64(seed),
    )
    .unwrap()
    .with_today(start())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_new_words_are_never_reintroduced_without_reset(
        seed in any::<u64>(),
        corpus_len in 1usize..60,
        new_count in 0usize..6,
        review_count in 0usize..4,
        days in 1usize..25,
    ) {
        let dir = TempDir::new().unwrap();
        let words = corpus(corpus_len);
        let mut s = scheduler(&dir, seed);

        for day in 0..days {
            s.set_today(start() + Duration::days(day as i64));
            let used_before = s.state().used_indices.clone();

            let selection = s.select_words(&words, new_count, review_count);
            let actual_new = new_count + (review_count - selection.review_words.len());
            let pool_before = corpus_len - used_before.len();

            let new_idx: HashSet<usize> = selection.new_words.iter().map(|w| w.index).collect();
            prop_assert_eq!(new_idx.len(), selection.new_words.len());

            if pool_before >= actual_new {
                for idx in &new_idx {
                    prop_assert!(!used_before.contains(idx));
                }
            }
            for idx in &new_idx {
                prop_assert!(s.state().used_indices.contains(idx));
            }

            for w in &selection.review_words {
                s.mark_reviewed(w.index);
            }
        }
    }

    #[test]
    fn prop_review_dates_advance_and_mastery_is_capped(
        seed in any::<u64>(),
        corpus_len in 5usize..40,
        days in 1usize..60,
    ) {
        let dir = TempDir::new().unwrap();
        let words = corpus(corpus_len);
        let mut s = scheduler(&dir, seed);
        let max_level = SchedulerConfig::default().max_level();

        for day in 0..days {
            let today = start() + Duration::days(day as i64);
            s.set_today(today);
            let selection = s.select_words(&words, 2, 3);

            for w in &selection.review_words {
                let before = s.state().words.get(&w.index).cloned();
                if s.mark_reviewed(w.index) {
                    let after = &s.state().words[&w.index];
                    prop_assert!(after.next_review > today);
                    prop_assert_eq!(after.last_review, today);
                    if let Some(before) = before {
                        prop_assert!(after.next_review >= before.next_review);
                        prop_assert!(after.mastery_level >= before.mastery_level);
                    }
                }
            }

            for (idx, st) in &s.state().words {
                prop_assert!(s.state().used_indices.contains(idx));
                prop_assert!(st.mastery_level <= max_level);
                prop_assert!(st.next_review >= st.last_review);
            }
        }
    }

    #[test]
    fn prop_daily_quota_is_met_when_word_list_allows(
        seed in any::<u64>(),
        corpus_len in 0usize..50,
        new_count in 0usize..6,
        review_count in 0usize..6,
        days in 1usize..20,
    ) {
        let dir = TempDir::new().unwrap();
        let words = corpus(corpus_len);
        let mut s = scheduler(&dir, seed);

        for day in 0..days {
            s.set_today(start() + Duration::days(day as i64));
            let selection = s.select_words(&words, new_count, review_count);

            prop_assert!(selection.review_words.len() <= review_count);
            prop_assert!(selection.len() <= new_count + review_count);
            if corpus_len >= new_count + review_count {
                prop_assert_eq!(selection.len(), new_count + review_count);
            }

            for w in &selection.review_words {
                s.mark_reviewed(w.index);
            }
        }
    }
}
