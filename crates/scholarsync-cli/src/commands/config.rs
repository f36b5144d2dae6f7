//! Settings in `config.toml`, addressed by dot-path keys.

use clap::Subcommand;
use scholarsync_core::{Config, ConfigError};

use super::CmdResult;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value, e.g. `timer.focus_minutes` or `planner.model`
    Get { key: String },
    /// Change one value and write the file
    Set { key: String, value: String },
    /// Print every value (the API key is masked)
    List,
    /// Overwrite the file with the defaults
    Reset,
}

pub fn run(action: ConfigAction) -> CmdResult {
    match action {
        ConfigAction::Get { key } => {
            let value = Config::load_or_default()
                .get(&key)
                .ok_or_else(|| ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            let stored = config.get(&key).unwrap_or(value);
            println!("{key} = {stored}");
        }
        ConfigAction::List => {
            let entries = Config::load_or_default().entries();
            let width = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
            for (key, value) in entries {
                println!("{key:<width$} = {value}");
            }
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("Configuration reset to defaults");
        }
    }
    Ok(())
}
