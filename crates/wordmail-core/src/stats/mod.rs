//! Read-only statistics over the review history.
//!
//! Nothing here mutates the state; the dashboard and the `stats` command
//! recompute a fresh report from the file on every request.

mod dashboard;
mod report;

pub use dashboard::render_dashboard;
pub use report::{word_list, DailyCount, IndexedWord, StatisticsReport};
