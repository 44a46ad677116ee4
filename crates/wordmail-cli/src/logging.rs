//! Console logging plus an optional log file from `paths.log_file`.

use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use wordmail_core::Config;

pub fn init(verbose: bool) {
    let default = if verbose {
        "wordmail=debug,wordmail_core=debug"
    } else {
        "wordmail=info,wordmail_core=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let console = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    // Never creates the config; a broken one is reported by the command itself.
    let log_file = Config::read_existing()
        .ok()
        .flatten()
        .and_then(|c| c.paths.log_file);
    let file = log_file.and_then(|path| {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("warning: cannot open log file {}: {e}", path.display());
                None
            }
        }
    });
    let file_layer = file.map(|f| fmt::layer().with_ansi(false).with_writer(Mutex::new(f)));

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .init();
}
