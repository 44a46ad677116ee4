use chrono::Local;
use clap::Subcommand;
use serde_json::json;
use wordmail_core::{word_list, Config, ProgressSummary, StatisticsReport};

use super::{load_state, word_count};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Aggregate statistics
    Summary,
    /// Every learned word, most recently reviewed first
    Words,
    /// Learned and mastered counts against the word list
    Progress,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let state = load_state(&config)?;

    match action {
        StatsAction::Summary => {
            let today = Local::now().date_naive();
            let report = StatisticsReport::compute(&state, word_count(&config), today);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        StatsAction::Words => {
            let words = word_list(&state);
            let out = json!({ "total": words.len(), "words": words });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        StatsAction::Progress => {
            let progress = ProgressSummary::from_state(&state, word_count(&config));
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
    }
    Ok(())
}
