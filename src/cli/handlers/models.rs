use crate::llm::catalog::MODELS;
use anyhow::Result;
use colored::Colorize;
use serde_json::json;

pub fn handle_models(current_model_id: &str, json: bool) -> Result<()> {
    if json {
        let models: Vec<_> = MODELS
            .iter()
            .map(|m| {
                json!({
                    "alias": m.alias,
                    "name": m.display_name,
                    "model_id": m.model_id,
                    "current": m.model_id == current_model_id,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&models)?);
        return Ok(());
    }

    for m in MODELS {
        let marker = if m.model_id == current_model_id {
            "*".green().bold().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "{} {} {:<20} {}",
            marker,
            format!("{:<12}", m.alias).cyan(),
            m.display_name,
            m.model_id.dimmed()
        );
    }
    if !MODELS.iter().any(|m| m.model_id == current_model_id) {
        println!("{} {} (custom)", "*".green().bold(), current_model_id.cyan());
    }
    Ok(())
}
