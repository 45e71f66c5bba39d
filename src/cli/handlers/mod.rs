mod diagram;
mod document;
mod init;
mod items;
mod models;
mod utils;

pub use diagram::handle_diagram;
pub use document::{DocumentArgs, handle_document};
pub use init::handle_init;
pub use items::{ItemsArgs, handle_items};
pub use models::handle_models;

use crate::config::ReqsmithConfig;
use crate::llm::{HttpModelClient, ModelClient, RetryPolicy, ScriptedClient, catalog};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Common context passed to the model-backed command handlers
pub struct CommandContext {
    pub config: ReqsmithConfig,
    pub root: PathBuf,
    pub client: Box<dyn ModelClient>,
    pub retry: RetryPolicy,
}

impl CommandContext {
    pub fn new(config: ReqsmithConfig, root: PathBuf, replay: Option<&str>) -> Result<Self> {
        let client: Box<dyn ModelClient> = match replay {
            Some(path) => Box::new(
                ScriptedClient::from_file(Path::new(path))
                    .with_context(|| format!("Failed to load replay script {}", path))?,
            ),
            None => Box::new(HttpModelClient::from_settings(&config.model)?),
        };
        let retry = RetryPolicy::from(&config.retry);
        Ok(Self {
            config,
            root,
            client,
            retry,
        })
    }

    /// Output directory: explicit flag, else the configured dir under the project root.
    pub fn output_dir(&self, flag: Option<&str>) -> PathBuf {
        match flag {
            Some(dir) => PathBuf::from(dir),
            None => self.config.output_path(&self.root),
        }
    }
}

/// Load config from `--config` or by upward search, falling back to defaults,
/// then apply the `--model` override.
pub fn load_config(config_path: Option<&str>, model: Option<&str>) -> Result<(ReqsmithConfig, PathBuf)> {
    let (mut config, root) = match config_path {
        Some(path) => {
            let path = PathBuf::from(path);
            let config = ReqsmithConfig::load_file(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            let root = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            (config, root)
        }
        None => ReqsmithConfig::load_or_default(&std::env::current_dir()?)?,
    };
    if let Some(model) = model {
        config.model.model_id = catalog::resolve(model);
    }
    Ok((config, root))
}
