//! # wordmail core library
//!
//! Business logic for wordmail, a daily vocabulary mailer. Every operation
//! is exposed by the `wordmail` CLI binary; this crate holds everything the
//! CLI composes.
//!
//! ## Architecture
//!
//! - **Corpus**: line-oriented word list parser
//! - **Review**: spaced-repetition scheduler over a JSON history file
//! - **Enrichment**: best-effort example sentences, audio and pictures
//! - **Mail**: text/HTML rendering and SMTP delivery
//! - **Stats**: read-only reports over the history
//! - **Storage**: TOML configuration and the data directory
//!
//! ## Key Components
//!
//! - [`ReviewScheduler`]: word selection and review bookkeeping
//! - [`Corpus`]: the parsed word list
//! - [`ExampleFetcher`]: media lookups
//! - [`Mailer`]: daily mail delivery
//! - [`Config`]: application configuration management

pub mod corpus;
pub mod enrichment;
pub mod error;
pub mod mail;
pub mod review;
pub mod stats;
pub mod storage;

pub use corpus::{Corpus, WordRecord};
pub use enrichment::{EnrichedWord, Endpoints, Example, ExampleFetcher, WordMedia};
pub use error::{
    ConfigError, CoreError, CorpusError, MailError, StateError, ValidationError,
};
pub use mail::{MailComposer, Mailer};
pub use review::{
    ProgressSummary, ReviewScheduler, ReviewState, SchedulerConfig, SchedulerState, SelectedWord,
    Selection, StateStore,
};
pub use stats::{render_dashboard, word_list, DailyCount, IndexedWord, StatisticsReport};
pub use storage::{data_dir, Config};
