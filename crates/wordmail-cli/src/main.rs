use clap::{Parser, Subcommand};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "wordmail", version, about = "Daily vocabulary mail with spaced repetition")]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select today's words, mail them and save the history
    Send(commands::send::SendArgs),
    /// Show today's due reviews without changing anything
    Preview,
    /// Review history maintenance
    Review {
        #[command(subcommand)]
        action: commands::review::ReviewAction,
    },
    /// Learning statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Serve the statistics dashboard over HTTP
    Serve(commands::serve::ServeArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Send(args) => commands::send::run(args),
        Commands::Preview => commands::preview::run(),
        Commands::Review { action } => commands::review::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Serve(args) => commands::serve::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
