use clap::Subcommand;
use wordmail_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "smtp.server", "daily.new_count")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value; arrays such as review.intervals take JSON ("[1,2,4]")
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
    /// Print the config file location
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let mut json = serde_json::to_value(&config)?;
            if let Some(password) = json.pointer_mut("/smtp/password") {
                if password.as_str().is_some_and(|p| !p.is_empty()) {
                    *password = serde_json::Value::String("********".into());
                }
            }
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("config reset to defaults");
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
    }
    Ok(())
}
