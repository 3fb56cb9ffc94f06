//! OpenAI-compatible HTTP completion client
//!
//! Talks to any endpoint that implements the OpenAI chat-completions API.
//! Groq (the default provider) and OpenAI itself both do.
//!
//! # Example
//!
//! ```no_run
//! use ideaforge::llm::{CompletionClient, CompletionRequest, ModelConfig, OpenAICompatibleClient};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAICompatibleClient::new(
//!     "https://api.groq.com/openai/v1",
//!     std::env::var("GROQ_API_KEY")?,
//!     Duration::from_secs(30),
//! )?;
//!
//! let request = CompletionRequest::new("Say hi as JSON", &ModelConfig::default());
//! let text = client.complete(request).await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```

use super::client::CompletionClient;
use super::error::ProviderError;
use super::types::CompletionRequest;
use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible client with bearer-token authentication
///
/// The client is cheap to share behind an `Arc`; the underlying reqwest
/// client pools connections across calls.
pub struct OpenAICompatibleClient {
    /// Base URL without the trailing `/chat/completions`
    base_url: String,

    api_key: String,

    /// Shared HTTP client with connection pooling
    http_client: Client,

    /// Transport-level deadline
    timeout: Duration,

    name: String,
}

impl OpenAICompatibleClient {
    /// Creates a client for the given base URL
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root, e.g. `https://api.groq.com/openai/v1`
    /// * `api_key` - Bearer token sent with every request
    /// * `timeout` - Transport deadline applied by reqwest
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::unknown(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        let name = if base_url.contains("groq.com") {
            "Groq".to_string()
        } else if base_url.contains("openai.com") {
            "OpenAI".to_string()
        } else {
            "OpenAI-compatible".to_string()
        };

        Ok(Self {
            base_url,
            api_key: api_key.into(),
            http_client,
            timeout,
            name,
        })
    }

    fn classify_transport_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            error!("Provider request timed out after {:?}", self.timeout);
            ProviderError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else if e.is_connect() {
            error!("Cannot connect to provider at {}", self.base_url);
            ProviderError::unknown(format!("Connection failed: {}", e))
        } else {
            error!("Provider request error: {}", e);
            ProviderError::unknown(format!("Request failed: {}", e))
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAICompatibleClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = ChatCompletionRequest {
            model: &request.model,
            messages: vec![Message {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
            response_format: request.json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        debug!(
            model = %request.model,
            prompt_length = request.prompt.len(),
            "Sending chat completion request"
        );

        let start = Instant::now();

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();

            error!("{} API returned error status {}: {}", self.name, status, body);

            return Err(ProviderError::from_status(
                status.as_u16(),
                body,
                retry_after,
            ));
        }

        let api_response: ChatCompletionResponse = response.json().await.map_err(|e| {
            error!("Failed to decode {} response envelope: {}", self.name, e);
            ProviderError::unknown(format!("Invalid response envelope: {}", e))
        })?;

        info!(
            "{} completion finished in {:.2}s",
            self.name,
            start.elapsed().as_secs_f64()
        );

        if let Some(usage) = &api_response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Token usage"
            );
        }

        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| ProviderError::unknown("No content in provider response"))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for OpenAICompatibleClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAICompatibleClient")
            .field("base_url", &self.base_url)
            .field("name", &self.name)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_naming() {
        let groq = OpenAICompatibleClient::new(GROQ_BASE_URL, "k", Duration::from_secs(5)).unwrap();
        assert_eq!(groq.name(), "Groq");

        let openai =
            OpenAICompatibleClient::new(OPENAI_BASE_URL, "k", Duration::from_secs(5)).unwrap();
        assert_eq!(openai.name(), "OpenAI");

        let local =
            OpenAICompatibleClient::new("http://localhost:8000/v1/", "k", Duration::from_secs(5))
                .unwrap();
        assert_eq!(local.name(), "OpenAI-compatible");
        assert_eq!(local.base_url, "http://localhost:8000/v1");
    }

    #[test]
    fn test_request_serialization_with_json_mode() {
        let body = ChatCompletionRequest {
            model: "m",
            messages: vec![Message {
                role: "user",
                content: "hi",
            }],
            temperature: 0.7,
            max_tokens: 2048,
            stream: false,
            response_format: Some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["response_format"]["type"], "json_object");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["max_tokens"], 2048);
    }

    #[test]
    fn test_request_serialization_without_json_mode() {
        let body = ChatCompletionRequest {
            model: "m",
            messages: vec![],
            temperature: 0.7,
            max_tokens: 16,
            stream: false,
            response_format: None,
        };

        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("response_format").is_none());
    }

    #[test]
    fn test_response_envelope_decoding() {
        let raw = r#"{
            "choices": [{"message": {"role": "assistant", "content": "{\"ok\":true}"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;

        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        let content = parsed.choices[0]
            .message
            .as_ref()
            .and_then(|m| m.content.clone());
        assert_eq!(content.as_deref(), Some(r#"{"ok":true}"#));
        assert_eq!(parsed.usage.unwrap().completion_tokens, 5);
    }
}
