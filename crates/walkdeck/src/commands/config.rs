use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let config = Config::load_or_default();
            let yaml = serde_yaml::to_string(&config)?;
            if config.defaults.is_none() {
                println!("{}", "No configuration set; using defaults.".dimmed());
            } else {
                print!("{yaml}");
            }
            if let Ok(path) = Config::path() {
                println!("{} {}", "path:".dimmed(), path.display());
            }
            Ok(())
        }
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load_or_default();
            config.set(&key, &value)?;
            let path = config.save()?;
            println!("{} {key} = {value}", "saved".green().bold());
            println!("{} {}", "path:".dimmed(), path.display());
            Ok(())
        }
    }
}
