use super::error::ProviderError;
use super::types::CompletionRequest;
use async_trait::async_trait;

/// A text-completion service reachable by one request/response call.
///
/// Implementations must not keep per-call state: a single client is shared by
/// every pipeline run and may be called concurrently.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends the prompt and returns the raw response text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;

    fn name(&self) -> &str;

    fn model_info(&self) -> Option<String> {
        None
    }
}
