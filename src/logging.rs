use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Length of the prompt/response excerpt attached to LLM log events.
pub const PREVIEW_CHARS: usize = 200;

const LOG_FILE_NAME: &str = "llm_operations.log";

/// Initialize the logging system
///
/// # Arguments
/// * `verbose` - Enable verbose (DEBUG) logging on stderr
/// * `log_dir` - Optional directory for the rolling JSON log file. If None, logs only to stderr
pub fn init(verbose: bool, log_dir: Option<PathBuf>) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("reqsmith={}", default_level)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(env_filter);

    let subscriber = tracing_subscriber::registry().with(stderr_layer);

    if let Some(dir) = log_dir {
        if std::fs::create_dir_all(&dir).is_err() {
            subscriber.init();
            return;
        }

        let file_appender = tracing_appender::rolling::daily(&dir, LOG_FILE_NAME);

        // The file keeps the full operation history even when stderr is quiet.
        let file_layer = fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .json()
            .with_filter(EnvFilter::new("reqsmith=info"));

        subscriber.with(file_layer).init();
    } else {
        subscriber.init();
    }
}

/// Truncate `text` to [`PREVIEW_CHARS`] characters, marking the cut with `...`.
pub fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

pub fn llm_request(request_type: &str, model_id: &str, prompt: &str) {
    tracing::info!(
        kind = "llm_request",
        request_type,
        model_id,
        prompt_length = prompt.len(),
        prompt_preview = %preview(prompt),
        "LLM request"
    );
}

pub fn llm_response(
    request_type: &str,
    model_id: &str,
    response: &str,
    elapsed: Duration,
    attempt: u32,
    max_attempts: u32,
) {
    tracing::info!(
        kind = "llm_response",
        request_type,
        model_id,
        response_length = response.len(),
        response_preview = %preview(response),
        processing_time_seconds = elapsed.as_secs_f64(),
        attempt,
        max_attempts,
        "LLM response"
    );
}

pub fn llm_error(
    request_type: &str,
    model_id: &str,
    error: &dyn std::fmt::Display,
    attempt: u32,
    max_attempts: u32,
) {
    tracing::error!(
        kind = "llm_error",
        request_type,
        model_id,
        error = %error,
        attempt,
        max_attempts,
        "LLM error"
    );
}

/// Record a pipeline step transition; `details` is free-form context.
pub fn workflow_step(step_name: &str, status: &str, details: serde_json::Value) {
    match status {
        "failed" | "error" => tracing::warn!(
            kind = "workflow_step",
            step_name,
            status,
            details = %details,
            "Workflow step"
        ),
        _ => tracing::info!(
            kind = "workflow_step",
            step_name,
            status,
            details = %details,
            "Workflow step"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Once;

    static INIT: Once = Once::new();

    fn init_test_logging() {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_test_writer()
                .with_max_level(tracing::Level::DEBUG)
                .try_init();
        });
    }

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_preview_truncates_long_text() {
        let long = "x".repeat(PREVIEW_CHARS + 50);
        let p = preview(&long);
        assert_eq!(p.len(), PREVIEW_CHARS + 3);
        assert!(p.ends_with("..."));
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let long = "é".repeat(PREVIEW_CHARS + 1);
        let p = preview(&long);
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_event_helpers_do_not_panic() {
        init_test_logging();
        llm_request("test", "model", "prompt");
        llm_response("test", "model", "response", Duration::from_millis(5), 1, 3);
        llm_error("test", "model", &"boom", 1, 3);
        workflow_step("expand_requirement", "failed", serde_json::json!({"error": "x"}));
    }
}
