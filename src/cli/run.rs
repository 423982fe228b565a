use std::{fs, path::Path};

use anyhow::Result;

use super::args::{Arguments, Command};
use crate::commands::{CommandSummary, InitSummary, count, scan};
use crate::config::{CONFIG_FILE_NAME, default_config_json};

pub fn run(Arguments { command }: Arguments) -> Result<CommandSummary> {
    match command {
        Some(Command::Scan(cmd)) => Ok(CommandSummary::Scan(scan(cmd)?)),
        Some(Command::Count(cmd)) => Ok(CommandSummary::Count(count(cmd)?)),
        Some(Command::Init) => {
            init()?;
            Ok(CommandSummary::Init(InitSummary { created: true }))
        }
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}

fn init() -> Result<()> {
    let config_path = Path::new(CONFIG_FILE_NAME);
    if config_path.exists() {
        anyhow::bail!("{} already exists", CONFIG_FILE_NAME);
    }

    fs::write(config_path, default_config_json()?)?;
    Ok(())
}
