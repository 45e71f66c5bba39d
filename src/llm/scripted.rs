use super::{CompletionRequest, ModelClient};
use crate::error::{ReqsmithError, Result};
use serde::Deserialize;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;

/// One canned reply. In a replay file a plain string is a successful
/// completion and `{ error: "..." }` is a failed call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScriptedReply {
    Text(String),
    Failure { error: String },
}

/// Replays canned replies in order and records every prompt it receives.
pub struct ScriptedClient {
    model_id: String,
    replies: RefCell<VecDeque<ScriptedReply>>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedClient {
    pub fn new(replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
        Self {
            model_id: "scripted".to_string(),
            replies: RefCell::new(replies.into_iter().collect()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    /// Convenience for scripts made only of successful replies.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(texts.into_iter().map(|t| ScriptedReply::Text(t.into())))
    }

    /// Load a YAML (or JSON) list of replies.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let replies: Vec<ScriptedReply> = serde_yaml::from_str(&content)?;
        tracing::debug!(path = %path.display(), replies = replies.len(), "Loaded replay script");
        Ok(Self::new(replies).with_model_id(format!("replay:{}", path.display())))
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.replies.borrow().len()
    }
}

impl ModelClient for ScriptedClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.prompts.borrow_mut().push(request.prompt.clone());
        match self.replies.borrow_mut().pop_front() {
            Some(ScriptedReply::Text(text)) if text.trim().is_empty() => {
                Err(ReqsmithError::EmptyResponse)
            }
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Failure { error }) => Err(ReqsmithError::Transport(error)),
            None => Err(ReqsmithError::Transport(
                "replay script exhausted".to_string(),
            )),
        }
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationSettings;
    use tempfile::TempDir;

    fn request(prompt: &str) -> CompletionRequest {
        CompletionRequest::new(prompt, &GenerationSettings::default())
    }

    #[test]
    fn test_replies_in_order_and_records_prompts() {
        let client = ScriptedClient::from_texts(["one", "two"]);
        assert_eq!(client.complete(&request("a")).unwrap(), "one");
        assert_eq!(client.complete(&request("b")).unwrap(), "two");
        assert!(client.complete(&request("c")).is_err());
        assert_eq!(client.prompts(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_failure_entries_become_errors() {
        let client = ScriptedClient::new([
            ScriptedReply::Failure {
                error: "throttled".to_string(),
            },
            ScriptedReply::Text("ok".to_string()),
        ]);
        assert!(matches!(
            client.complete(&request("a")),
            Err(ReqsmithError::Transport(msg)) if msg == "throttled"
        ));
        assert_eq!(client.complete(&request("a")).unwrap(), "ok");
    }

    #[test]
    fn test_from_file_mixes_text_and_errors() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("replay.yml");
        std::fs::write(&path, "- \"first reply\"\n- error: timed out\n- |\n  multi\n  line\n")
            .unwrap();

        let client = ScriptedClient::from_file(&path).unwrap();
        assert_eq!(client.remaining(), 3);
        assert!(client.model_id().starts_with("replay:"));
        assert_eq!(client.complete(&request("x")).unwrap(), "first reply");
        assert!(client.complete(&request("x")).is_err());
        assert_eq!(client.complete(&request("x")).unwrap(), "multi\nline\n");
    }
}
