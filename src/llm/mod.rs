//! Hosted model access.
//!
//! - [`ModelClient`]: one prompt in, one text completion out
//! - [`HttpModelClient`]: messages-style HTTP endpoint
//! - [`ScriptedClient`]: canned responses for `--replay` and tests
//! - [`complete_with_retry`]: bounded retry with exponential backoff
//! - [`catalog`]: model aliases accepted by `--model`

pub mod catalog;
mod http;
mod retry;
mod scripted;

pub use http::HttpModelClient;
pub use retry::{RetryPolicy, complete_with_retry};
pub use scripted::{ScriptedClient, ScriptedReply};

use crate::config::GenerationSettings;
use crate::error::Result;

/// A single-turn prompt with its sampling parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: Option<f32>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, settings: &GenerationSettings) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            top_p: settings.top_p,
        }
    }
}

pub trait ModelClient {
    /// Send one request and return the model's text.
    fn complete(&self, request: &CompletionRequest) -> Result<String>;

    fn model_id(&self) -> &str;
}

impl<T: ModelClient + ?Sized> ModelClient for Box<T> {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        (**self).complete(request)
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}
