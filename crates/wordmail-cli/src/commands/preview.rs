use serde_json::json;
use wordmail_core::{Config, Corpus, ReviewScheduler};

/// Due reviews and progress for today. Opens the history read-only: nothing
/// is selected and nothing is saved.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let corpus = Corpus::load(&config.corpus_path()?)?;
    let scheduler = ReviewScheduler::open(config.state_path()?, config.scheduler_config())?;

    let mut due = scheduler.due_review_words(corpus.words());
    due.sort_by_key(|w| w.index);

    let out = json!({
        "today": scheduler.today(),
        "due_count": due.len(),
        "review_quota": config.daily.review_count,
        "due": due,
        "progress": scheduler.progress(corpus.len()),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
