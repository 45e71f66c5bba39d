use crate::config::{CONFIG_FILE_NAME, ReqsmithConfig};
use crate::error::ReqsmithError;
use anyhow::Result;
use colored::Colorize;

pub fn handle_init(force: bool) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config_path = cwd.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        return Err(ReqsmithError::AlreadyInitialized(config_path.display().to_string()).into());
    }

    let config = ReqsmithConfig::default();
    config.save(&config_path)?;

    println!(
        "{} reqsmith project in {}",
        "Initialized".green(),
        cwd.display()
    );
    println!("  Config: {}", config_path.display());
    println!("  Model:  {}", config.model.model_id.cyan());
    println!(
        "  API key is read from {}",
        config.model.api_key_env.yellow()
    );

    Ok(())
}
