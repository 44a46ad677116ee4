use clap::Args;
use wordmail_core::{
    Config, CoreError, Corpus, EnrichedWord, ExampleFetcher, MailComposer, Mailer,
    ReviewScheduler,
};

use super::runtime;

#[derive(Args)]
pub struct SendArgs {
    /// Print the mail instead of sending it; the history is not saved
    #[arg(long)]
    dry_run: bool,
    /// Skip example, image and audio lookups
    #[arg(long)]
    no_enrich: bool,
}

pub fn run(args: SendArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let rt = runtime()?;

    let result = rt.block_on(daily_run(&config, &args));
    if let Err(e) = &result {
        tracing::error!(error = %e, "daily run failed");
        if config.notify_on_error && !args.dry_run {
            let mailer = Mailer::new(config.smtp.clone());
            if let Err(notify) = rt.block_on(mailer.send_error_notification(&e.to_string())) {
                tracing::error!(error = %notify, "error notification failed");
            }
        }
    }
    result.map_err(Into::into)
}

async fn daily_run(config: &Config, args: &SendArgs) -> Result<(), CoreError> {
    if !args.dry_run {
        config.smtp.ensure_addresses()?;
    }

    let corpus = Corpus::load_non_empty(&config.corpus_path()?)?;
    tracing::info!(words = corpus.len(), "word list loaded");

    let mut scheduler = ReviewScheduler::open(config.state_path()?, config.scheduler_config())?;
    let today = scheduler.today();
    let selection = scheduler.select_words(
        corpus.words(),
        config.daily.new_count,
        config.daily.review_count,
    );
    let progress = scheduler.progress(corpus.len());
    tracing::info!(
        learned = progress.learned,
        total = progress.total,
        percent = progress.progress_percent,
        "progress"
    );

    let reviewed: Vec<usize> = selection.review_words.iter().map(|w| w.index).collect();
    let words = selection.into_words();
    let words = if args.no_enrich || !config.enrichment.enabled {
        words.into_iter().map(EnrichedWord::bare).collect()
    } else {
        ExampleFetcher::new(&config.enrichment).enrich_all(words).await
    };

    if args.dry_run {
        println!("{}", MailComposer::subject(today));
        println!();
        println!("{}", MailComposer::render_text(&words, &progress, today));
        tracing::info!("dry run, history not saved");
        return Ok(());
    }

    Mailer::new(config.smtp.clone())
        .send_words(&words, &progress, today)
        .await?;

    for index in reviewed {
        scheduler.mark_reviewed(index);
    }
    scheduler.persist()?;
    Ok(())
}
