use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReqsmithError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Model API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("{request_type} failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        request_type: String,
        attempts: u32,
        last_error: Box<ReqsmithError>,
    },

    #[error("No JSON {expected} found in model response")]
    NoJson { expected: &'static str },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("No .reqsmith.yml found. Run 'reqsmith init' first.")]
    NotInitialized,

    #[error("Project already initialized at {0}")]
    AlreadyInitialized(String),
}

impl From<reqwest::Error> for ReqsmithError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => ReqsmithError::Api {
                status: status.as_u16(),
                message: e.to_string(),
            },
            None => ReqsmithError::Transport(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReqsmithError>;
