use clap::Subcommand;
use topicfocus_core::{Config, ConfigError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting
    Get {
        /// Dot-separated key, e.g. "timer.work_minutes"
        key: String,
    },
    /// Change one setting; range-checked before anything is written
    Set {
        /// Dot-separated key
        key: String,
        /// New value
        value: String,
    },
    /// Print every setting as `key = value`, with accepted ranges
    List {
        /// Print the whole config as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Print the config file location
    Path,
    /// Overwrite the config file with defaults
    Reset,
}

fn describe(key: &str, value: &str) -> String {
    match Config::bounds(key) {
        Some((min, max)) => format!("{key} = {value} ({min}..={max})"),
        None => format!("{key} = {value}"),
    }
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let value = Config::load()?
                .get(&key)
                .ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            let stored = config.get(&key).unwrap_or(value);
            println!("{}", describe(&key, &stored));
        }
        ConfigAction::List { json } => {
            let config = Config::load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                for (key, value) in config.entries() {
                    println!("{}", describe(&key, &value));
                }
            }
        }
        ConfigAction::Path => println!("{}", Config::path()?.display()),
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("defaults written to {}", Config::path()?.display());
        }
    }
    Ok(())
}
