use super::{CompletionRequest, ModelClient};
use crate::config::RetrySettings;
use crate::error::{ReqsmithError, Result};
use crate::logging;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetrySettings::default())
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            base_delay: Duration::from_millis(settings.base_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// No waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::ZERO,
        }
    }

    /// Pause after the failed attempt `attempt` (0-based): `base * 2^attempt`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt.min(16)))
    }
}

/// Call the model, retrying failures with exponential backoff.
///
/// `request_type` labels the call in logs and in the final error.
pub fn complete_with_retry(
    client: &dyn ModelClient,
    request: &CompletionRequest,
    request_type: &str,
    policy: &RetryPolicy,
) -> Result<String> {
    let model_id = client.model_id();
    logging::llm_request(request_type, model_id, &request.prompt);

    let started = Instant::now();
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        match client.complete(request) {
            Ok(text) => {
                logging::llm_response(
                    request_type,
                    model_id,
                    &text,
                    started.elapsed(),
                    attempt + 1,
                    max_attempts,
                );
                return Ok(text);
            }
            Err(e) => {
                logging::llm_error(request_type, model_id, &e, attempt + 1, max_attempts);

                if attempt + 1 >= max_attempts {
                    return Err(ReqsmithError::RetriesExhausted {
                        request_type: request_type.to_string(),
                        attempts: max_attempts,
                        last_error: Box::new(e),
                    });
                }

                let delay = policy.delay_after(attempt);
                if !delay.is_zero() {
                    tracing::debug!(attempt = attempt + 1, ?delay, "Backing off before retry");
                    std::thread::sleep(delay);
                }
                attempt += 1;
            }
        }
    }
}
