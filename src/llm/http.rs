use super::{CompletionRequest, ModelClient};
use crate::config::ModelSettings;
use crate::error::{ReqsmithError, Result};
use serde::{Deserialize, Serialize};

/// Blocking client for a messages-style completion endpoint.
pub struct HttpModelClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    model_id: String,
    api_key: String,
    api_version: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl HttpModelClient {
    /// Build a client from settings, reading the API key from the configured
    /// environment variable.
    pub fn from_settings(settings: &ModelSettings) -> Result<Self> {
        let api_key = std::env::var(&settings.api_key_env).map_err(|_| {
            ReqsmithError::Config(format!(
                "API key not set. Export {} or use --replay.",
                settings.api_key_env
            ))
        })?;
        Self::new(settings, api_key)
    }

    pub fn new(settings: &ModelSettings, api_key: String) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| ReqsmithError::Transport(e.to_string()))?;

        tracing::debug!(endpoint = %settings.endpoint, model_id = %settings.model_id, "Model client ready");

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            model_id: settings.model_id.clone(),
            api_key,
            api_version: settings.api_version.clone(),
        })
    }
}

impl ModelClient for HttpModelClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = MessagesRequest {
            model: &self.model_id,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            messages: [Message {
                role: "user",
                content: &request.prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(ReqsmithError::Api {
                status: status.as_u16(),
                message: api_error_message(&text),
            });
        }

        let parsed: MessagesResponse = response.json()?;
        first_text(parsed)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

fn first_text(response: MessagesResponse) -> Result<String> {
    response
        .content
        .into_iter()
        .find_map(|block| block.text)
        .filter(|text| !text.trim().is_empty())
        .ok_or(ReqsmithError::EmptyResponse)
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationSettings;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Serve one canned response on a local port. The raw request arrives on
    /// the returned channel.
    fn serve_once(status: &str, body: &str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut request = String::new();
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if let Some((name, value)) = line.split_once(':')
                    && name.eq_ignore_ascii_case("content-length")
                {
                    content_length = value.trim().parse().unwrap();
                }
                request.push_str(&line);
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }
            let mut payload = vec![0; content_length];
            reader.read_exact(&mut payload).unwrap();
            request.push_str(&String::from_utf8_lossy(&payload));

            let mut stream = reader.into_inner();
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            tx.send(request).unwrap();
        });

        (format!("http://127.0.0.1:{port}/v1/messages"), rx)
    }

    fn local_client(endpoint: String) -> HttpModelClient {
        let _ = rustls::crypto::ring::default_provider().install_default();
        let settings = ModelSettings {
            endpoint,
            model_id: "local-model".to_string(),
            timeout_secs: 5,
            ..ModelSettings::default()
        };
        HttpModelClient::new(&settings, "test-key".to_string()).unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new("Summarise the login flow", &GenerationSettings::default())
    }

    #[test]
    fn test_complete_returns_first_text_block() {
        let (endpoint, requests) = serve_once(
            "200 OK",
            r#"{"content":[{"type":"text","text":"Login summary"},{"type":"text","text":"extra"}]}"#,
        );
        let client = local_client(endpoint);

        assert_eq!(client.complete(&request()).unwrap(), "Login summary");

        let raw = requests.recv().unwrap();
        let lower = raw.to_ascii_lowercase();
        assert!(raw.starts_with("POST /v1/messages "));
        assert!(lower.contains("x-api-key: test-key"));
        assert!(lower.contains("anthropic-version: 2023-06-01"));
        assert!(raw.contains(r#""model":"local-model""#));
        assert!(raw.contains("Summarise the login flow"));
    }

    #[test]
    fn test_complete_maps_overloaded_status_to_api_error() {
        let (endpoint, requests) =
            serve_once("529 Overloaded", r#"{"error":{"message":"Overloaded"}}"#);
        let client = local_client(endpoint);

        match client.complete(&request()) {
            Err(ReqsmithError::Api { status, message }) => {
                assert_eq!(status, 529);
                assert_eq!(message, "Overloaded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        assert!(requests
            .recv()
            .unwrap()
            .to_ascii_lowercase()
            .contains("x-api-key: test-key"));
    }

    #[test]
    fn test_request_body_shape() {
        let body = MessagesRequest {
            model: "m",
            max_tokens: 1000,
            temperature: 0.5,
            top_p: None,
            messages: [Message {
                role: "user",
                content: "hello",
            }],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], "m");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hello");
        assert!(value.get("top_p").is_none());
    }

    #[test]
    fn test_first_text_block_is_returned() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"first"},{"type":"text","text":"second"}]}"#,
        )
        .unwrap();
        assert_eq!(first_text(response).unwrap(), "first");
    }

    #[test]
    fn test_blank_content_is_empty_response() {
        let response: MessagesResponse =
            serde_json::from_str(r#"{"content":[{"type":"text","text":"  "}]}"#).unwrap();
        assert!(matches!(
            first_text(response),
            Err(ReqsmithError::EmptyResponse)
        ));
    }

    #[test]
    fn test_api_error_message_prefers_structured_error() {
        let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        assert_eq!(api_error_message(body), "Overloaded");
        assert_eq!(api_error_message("plain failure\n"), "plain failure");
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let settings = ModelSettings {
            api_key_env: "REQSMITH_TEST_KEY_THAT_IS_NOT_SET".to_string(),
            ..ModelSettings::default()
        };
        assert!(matches!(
            HttpModelClient::from_settings(&settings),
            Err(ReqsmithError::Config(_))
        ));
    }
}
