//! Configuration command.

use crate::cli::ConfigAction;
use crate::config::Settings;
use crate::error::{PageChatError, Result};

/// Run the config subcommand.
pub fn run_config(action: &ConfigAction, settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let content = toml::to_string_pretty(&settings)
                .map_err(|e| PageChatError::Config(e.to_string()))?;
            println!("{content}");
        }
        ConfigAction::Init => {
            let path = Settings::default_config_path();
            if path.exists() {
                println!("Config already exists at {}", path.display());
            } else {
                Settings::default().save_to(&path)?;
                println!("Wrote default config to {}", path.display());
            }
        }
        ConfigAction::Path => {
            println!("{}", Settings::default_config_path().display());
        }
    }
    Ok(())
}
