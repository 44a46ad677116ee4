pub mod config;
pub mod preview;
pub mod review;
pub mod send;
pub mod serve;
pub mod stats;

use wordmail_core::{Config, Corpus, SchedulerState, StateStore};

pub(crate) fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}

/// Current history as stored on disk.
pub(crate) fn load_state(config: &Config) -> Result<SchedulerState, Box<dyn std::error::Error>> {
    let store = StateStore::new(config.state_path()?);
    Ok(store.load(config.scheduler_config().max_level()))
}

/// Number of entries in the word list, 0 if it cannot be read.
pub(crate) fn word_count(config: &Config) -> usize {
    let path = match config.corpus_path() {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!(error = %e, "word list location unavailable");
            return 0;
        }
    };
    match Corpus::load(&path) {
        Ok(corpus) => corpus.len(),
        Err(e) => {
            tracing::warn!(error = %e, "word list unavailable, totals will read 0");
            0
        }
    }
}
