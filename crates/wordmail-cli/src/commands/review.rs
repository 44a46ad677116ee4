use clap::Subcommand;
use wordmail_core::{Config, ReviewScheduler};

#[derive(Subcommand)]
pub enum ReviewAction {
    /// Record a review of one word today
    Mark {
        /// Word list index of the word
        index: usize,
    },
    /// Forget all review history
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: ReviewAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut scheduler = ReviewScheduler::open(config.state_path()?, config.scheduler_config())?;

    match action {
        ReviewAction::Mark { index } => {
            if !scheduler.mark_reviewed(index) {
                return Err(format!("word {index} has not been introduced yet").into());
            }
            scheduler.persist()?;
            let state = &scheduler.state().words[&index];
            println!("{}", serde_json::to_string_pretty(state)?);
        }
        ReviewAction::Reset { yes } => {
            if !yes {
                return Err("refusing to clear the review history without --yes".into());
            }
            scheduler.reset();
            scheduler.persist()?;
            println!("review history cleared");
        }
    }
    Ok(())
}
