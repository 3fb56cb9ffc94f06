use crate::llm::{CompletionClient, CompletionRequest, ModelConfig, ProviderError};
use crate::prompt::{render_prompt, PromptVariables};
use std::sync::Arc;
use tracing::{debug, error};

/// Renders a template and sends it as a single completion request
///
/// Holds no per-call state, so one instance can serve concurrent runs.
#[derive(Clone)]
pub struct PromptCompleter {
    client: Arc<dyn CompletionClient>,
    model: ModelConfig,
}

impl PromptCompleter {
    pub fn new(client: Arc<dyn CompletionClient>, model: ModelConfig) -> Self {
        Self { client, model }
    }

    pub fn client(&self) -> &Arc<dyn CompletionClient> {
        &self.client
    }

    pub fn model(&self) -> &ModelConfig {
        &self.model
    }

    pub async fn complete(
        &self,
        template: &str,
        variables: &PromptVariables,
    ) -> Result<String, ProviderError> {
        let prompt = render_prompt(template, variables);
        debug!(
            backend = self.client.name(),
            model = %self.model.model,
            prompt_chars = prompt.len(),
            "Sending completion request"
        );

        let request = CompletionRequest::new(prompt, &self.model);
        match self.client.complete(request).await {
            Ok(text) => {
                debug!(response_chars = text.len(), "Completion received");
                Ok(text)
            }
            Err(e) => {
                error!(backend = self.client.name(), error = %e, "Completion request failed");
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for PromptCompleter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptCompleter")
            .field("client", &self.client.name())
            .field("model", &self.model)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MockCompletionClient, MockResponse};

    #[tokio::test]
    async fn test_complete_renders_and_forwards_model_parameters() {
        let mock = Arc::new(MockCompletionClient::new());
        mock.add_response(MockResponse::text("{}"));

        let model = ModelConfig::new("test-model").with_max_tokens(512);
        let completer = PromptCompleter::new(mock.clone(), model);
        let vars = PromptVariables::new().with("input", "drone delivery for islands");

        let text = completer.complete("Idea: {input}", &vars).await.unwrap();
        assert_eq!(text, "{}");

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].prompt.starts_with("Idea: drone delivery for islands"));
        assert_eq!(requests[0].model, "test-model");
        assert_eq!(requests[0].max_tokens, 512);
        assert!(requests[0].json_mode);
    }

    #[tokio::test]
    async fn test_complete_propagates_typed_errors() {
        let mock = Arc::new(MockCompletionClient::new());
        mock.add_response(MockResponse::error(ProviderError::RateLimited {
            retry_after: Some(3),
        }));

        let completer = PromptCompleter::new(mock, ModelConfig::default());
        let err = completer
            .complete("x", &PromptVariables::new())
            .await
            .unwrap_err();
        assert_eq!(err, ProviderError::RateLimited { retry_after: Some(3) });
    }
}
