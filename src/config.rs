use crate::error::{ReqsmithError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = ".reqsmith.yml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReqsmithConfig {
    #[serde(default)]
    pub model: ModelSettings,

    #[serde(default)]
    pub retry: RetrySettings,

    #[serde(default)]
    pub pipeline: PipelineSettings,

    #[serde(default)]
    pub diagram: DiagramSettings,

    #[serde(default)]
    pub document: DocumentSettings,

    #[serde(default)]
    pub output: OutputSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Default for ReqsmithConfig {
    fn default() -> Self {
        Self {
            model: ModelSettings::default(),
            retry: RetrySettings::default(),
            pipeline: PipelineSettings::default(),
            diagram: DiagramSettings::default(),
            document: DocumentSettings::default(),
            output: OutputSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model_id")]
    pub model_id: String,

    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_model_id() -> String {
    "claude-3-sonnet-20240229".to_string()
}

fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model_id: default_model_id(),
            api_key_env: default_api_key_env(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ModelSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

/// Sampling parameters for one family of model calls, as passed to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: Option<f32>,
    /// Pause between consecutive per-task calls. Only the work-item pipeline uses it.
    pub task_delay_ms: Option<u64>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        PipelineSettings::default().generation()
    }
}

impl GenerationSettings {
    pub fn diagram() -> Self {
        DiagramSettings::default().generation()
    }

    pub fn document() -> Self {
        DocumentSettings::default().generation()
    }

    pub fn task_delay(&self) -> Duration {
        Duration::from_millis(self.task_delay_ms.unwrap_or(0))
    }
}

/// `pipeline` section: the work-item converter calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSettings {
    #[serde(default = "default_pipeline_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_pipeline_temperature")]
    pub temperature: f32,

    #[serde(default = "default_task_delay_ms")]
    pub task_delay_ms: u64,
}

fn default_pipeline_max_tokens() -> u32 {
    1000
}

fn default_pipeline_temperature() -> f32 {
    0.5
}

fn default_task_delay_ms() -> u64 {
    500
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_tokens: default_pipeline_max_tokens(),
            temperature: default_pipeline_temperature(),
            task_delay_ms: default_task_delay_ms(),
        }
    }
}

impl PipelineSettings {
    pub fn generation(&self) -> GenerationSettings {
        GenerationSettings {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: None,
            task_delay_ms: Some(self.task_delay_ms),
        }
    }
}

/// `diagram` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramSettings {
    #[serde(default = "default_long_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_diagram_temperature")]
    pub temperature: f32,

    #[serde(default = "default_diagram_top_p")]
    pub top_p: f32,
}

fn default_long_max_tokens() -> u32 {
    4096
}

fn default_diagram_temperature() -> f32 {
    0.1
}

fn default_diagram_top_p() -> f32 {
    0.9
}

impl Default for DiagramSettings {
    fn default() -> Self {
        Self {
            max_tokens: default_long_max_tokens(),
            temperature: default_diagram_temperature(),
            top_p: default_diagram_top_p(),
        }
    }
}

impl DiagramSettings {
    pub fn generation(&self) -> GenerationSettings {
        GenerationSettings {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: Some(self.top_p),
            task_delay_ms: None,
        }
    }
}

/// `document` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSettings {
    #[serde(default = "default_long_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_document_temperature")]
    pub temperature: f32,
}

fn default_document_temperature() -> f32 {
    0.7
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            max_tokens: default_long_max_tokens(),
            temperature: default_document_temperature(),
        }
    }
}

impl DocumentSettings {
    pub fn generation(&self) -> GenerationSettings {
        GenerationSettings {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: None,
            task_delay_ms: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_output_dir")]
    pub dir: String,
}

fn default_output_dir() -> String {
    ".".to_string()
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_to_file")]
    pub file: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

fn default_log_to_file() -> bool {
    true
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: default_log_to_file(),
            dir: None,
        }
    }
}

impl LoggingSettings {
    /// Directory for the rolling log file: configured dir, then the
    /// platform data dir, then `logs/` under the working directory.
    pub fn log_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.dir {
            return PathBuf::from(dir);
        }
        directories::ProjectDirs::from("", "", "reqsmith")
            .map(|dirs| dirs.data_local_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }
}

impl ReqsmithConfig {
    /// Load the nearest `.reqsmith.yml`, returning it with its directory.
    pub fn load(start_path: &Path) -> Result<(Self, PathBuf)> {
        let config_path = Self::find_config_file(start_path)?;
        let config = Self::load_file(&config_path)?;
        let project_root = config_path
            .parent()
            .ok_or_else(|| {
                ReqsmithError::Config("Config file has no parent directory".to_string())
            })?
            .to_path_buf();
        Ok((config, project_root))
    }

    /// Like [`ReqsmithConfig::load`], but falls back to defaults rooted at
    /// `start_path` when no config file exists.
    pub fn load_or_default(start_path: &Path) -> Result<(Self, PathBuf)> {
        match Self::load(start_path) {
            Err(ReqsmithError::NotInitialized) => Ok((Self::default(), start_path.to_path_buf())),
            other => other,
        }
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ReqsmithConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn find_config_file(start_path: &Path) -> Result<PathBuf> {
        let mut current = start_path.to_path_buf();
        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Ok(config_path);
            }
            if !current.pop() {
                return Err(ReqsmithError::NotInitialized);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.model.endpoint).map_err(|e| {
            ReqsmithError::Config(format!("Invalid endpoint '{}': {}", self.model.endpoint, e))
        })?;
        if self.model.model_id.trim().is_empty() {
            return Err(ReqsmithError::Config("model_id cannot be empty".to_string()));
        }
        if self.retry.max_attempts == 0 {
            return Err(ReqsmithError::Config(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn output_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.output.dir)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_tool_settings() {
        let config = ReqsmithConfig::default();
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.pipeline.max_tokens, 1000);
        assert_eq!(
            config.pipeline.generation().task_delay(),
            Duration::from_millis(500)
        );
        assert_eq!(config.diagram.generation().top_p, Some(0.9));
        assert_eq!(config.document.max_tokens, 4096);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let yaml = "model:\n  model_id: claude-3-haiku-20240307\nretry:\n  max_attempts: 5\n";
        let config: ReqsmithConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.model.model_id, "claude-3-haiku-20240307");
        assert_eq!(config.model.api_key_env, "ANTHROPIC_API_KEY");
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.base_delay_ms, 1000);
        assert_eq!(config.diagram.generation(), GenerationSettings::diagram());
    }

    #[test]
    fn test_partial_generation_sections_keep_field_defaults() {
        let yaml = "pipeline:\n  task_delay_ms: 0\n";
        let config: ReqsmithConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.pipeline.max_tokens, 1000);
        assert_eq!(config.pipeline.temperature, 0.5);
        assert_eq!(config.pipeline.generation().task_delay(), Duration::ZERO);

        let yaml = "pipeline: {max_tokens: 2000, temperature: 0.5}\n\
                    diagram: {max_tokens: 2048, temperature: 0.1}\n\
                    document: {temperature: 0.2}\n";
        let config: ReqsmithConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.pipeline.max_tokens, 2000);
        assert_eq!(
            config.pipeline.generation().task_delay(),
            Duration::from_millis(500)
        );
        assert_eq!(config.diagram.max_tokens, 2048);
        assert_eq!(config.diagram.generation().top_p, Some(0.9));
        assert_eq!(config.document.max_tokens, 4096);
        assert_eq!(config.document.temperature, 0.2);
    }

    #[test]
    fn test_find_config_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        ReqsmithConfig::default()
            .save(&temp_dir.path().join(CONFIG_FILE_NAME))
            .unwrap();
        let nested = temp_dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let (_, root) = ReqsmithConfig::load(&nested).unwrap();
        assert_eq!(root, temp_dir.path());
    }

    #[test]
    fn test_load_or_default_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let (config, root) = ReqsmithConfig::load_or_default(temp_dir.path()).unwrap();
        assert_eq!(root, temp_dir.path());
        assert_eq!(config.model.model_id, default_model_id());
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let mut config = ReqsmithConfig::default();
        config.model.endpoint = "not a url".to_string();
        assert!(matches!(config.validate(), Err(ReqsmithError::Config(_))));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = ReqsmithConfig::default();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());
    }
}
