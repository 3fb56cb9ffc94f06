//! GenAI-based completion client
//!
//! Covers the providers that do not speak the OpenAI wire format
//! (Anthropic, Gemini, Ollama) through the `genai` crate.

use super::client::CompletionClient;
use super::error::ProviderError;
use super::types::CompletionRequest;
use async_trait::async_trait;
use genai::adapter::AdapterKind;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest, ChatResponseFormat};
use genai::resolver::{AuthData, Endpoint, ServiceTargetResolver};
use genai::{Client, ModelIden, ServiceTarget};
use std::time::Duration;
use tracing::{debug, error};

/// Completion client backed by the `genai` multi-provider client
pub struct GenAIClient {
    client: Client,
    provider: AdapterKind,
    /// Transport deadline
    timeout: Duration,
}

impl GenAIClient {
    /// Creates a new GenAI client
    ///
    /// # Arguments
    ///
    /// * `provider` - Adapter to route requests to
    /// * `model` - Model name (without provider prefix)
    /// * `endpoint` - Optional base URL override
    /// * `timeout` - Transport deadline
    pub fn new(
        provider: AdapterKind,
        model: &str,
        endpoint: Option<String>,
        timeout: Duration,
    ) -> Self {
        debug!(
            "Creating GenAI client: provider={}, model={}",
            provider.as_str(),
            model,
        );

        let model = model.to_string();
        let resolver = ServiceTargetResolver::from_resolver_fn(
            move |service_target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
                let endpoint = match &endpoint {
                    Some(url) => Endpoint::from_owned(url.clone()),
                    None => service_target.endpoint,
                };

                let auth = match provider.default_key_env_name() {
                    Some(api_key_var) => AuthData::from_env(api_key_var),
                    None => AuthData::from_single(""),
                };

                Ok(ServiceTarget {
                    endpoint,
                    auth,
                    model: ModelIden::new(provider, &model),
                })
            },
        );

        let client = Client::builder()
            .with_service_target_resolver(resolver)
            .build();

        Self {
            client,
            provider,
            timeout,
        }
    }
}

#[async_trait]
impl CompletionClient for GenAIClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let chat_request = ChatRequest::new(vec![ChatMessage::user(request.prompt)]);

        let mut options = ChatOptions::default()
            .with_temperature(request.temperature as f64)
            .with_max_tokens(request.max_tokens);
        if request.json_mode {
            options = options.with_response_format(ChatResponseFormat::JsonMode);
        }

        let response = match tokio::time::timeout(
            self.timeout,
            self.client
                .exec_chat(&request.model, chat_request, Some(&options)),
        )
        .await
        {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => {
                error!("{} API error: {}", self.provider.as_str(), e);
                return Err(ProviderError::unknown(format!(
                    "{} request failed: {}",
                    self.provider.as_str(),
                    e
                )));
            }
            Err(_) => {
                error!(
                    "{} request timed out after {}s",
                    self.provider.as_str(),
                    self.timeout.as_secs()
                );
                return Err(ProviderError::Timeout {
                    seconds: self.timeout.as_secs(),
                });
            }
        };

        response
            .first_text()
            .map(|text| text.to_string())
            .ok_or_else(|| ProviderError::unknown("No text content in provider response"))
    }

    fn name(&self) -> &str {
        self.provider.as_str()
    }
}

impl std::fmt::Debug for GenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAIClient")
            .field("provider", &self.provider)
            .field("timeout", &self.timeout)
            .finish()
    }
}
