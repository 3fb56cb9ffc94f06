use super::completion::PromptCompleter;
use super::context::StepResult;
use super::error::StepError;
use super::payloads::StagePayload;
use crate::prompt::PromptVariables;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Runs one stage: completion under a deadline, strict JSON parse, payload
/// validation. Makes exactly one attempt.
#[derive(Debug, Clone)]
pub struct StepExecutor {
    completer: PromptCompleter,
}

impl StepExecutor {
    pub fn new(completer: PromptCompleter) -> Self {
        Self { completer }
    }

    /// Executes a stage and reports the outcome; never fails.
    pub async fn run<T: StagePayload>(
        &self,
        template: &str,
        variables: &PromptVariables,
        timeout: Duration,
    ) -> StepResult {
        self.run_typed::<T>(template, variables, timeout).await.0
    }

    /// Like [`run`](Self::run), also handing back the decoded payload.
    pub async fn run_typed<T: StagePayload>(
        &self,
        template: &str,
        variables: &PromptVariables,
        timeout: Duration,
    ) -> (StepResult, Result<T, StepError>) {
        let stage = T::STAGE;
        let start = Instant::now();
        let outcome = self.execute::<T>(template, variables, timeout).await;
        let elapsed = start.elapsed();

        match outcome {
            Ok((value, payload)) => {
                debug!(stage = %stage, elapsed_ms = elapsed.as_millis() as u64, "Step succeeded");
                (StepResult::success(stage, value, elapsed), Ok(payload))
            }
            Err(e) => {
                warn!(stage = %stage, elapsed_ms = elapsed.as_millis() as u64, error = %e, "Step failed");
                (StepResult::failure(stage, e.clone(), elapsed), Err(e))
            }
        }
    }

    async fn execute<T: StagePayload>(
        &self,
        template: &str,
        variables: &PromptVariables,
        timeout: Duration,
    ) -> Result<(Value, T), StepError> {
        // Dropping the completion future on expiry cancels the in-flight request.
        let text = tokio::time::timeout(timeout, self.completer.complete(template, variables))
            .await
            .map_err(|_| StepError::Timeout {
                seconds: timeout.as_secs_f64(),
            })??;

        parse_payload::<T>(&text)
    }
}

/// Strictly parses a stage response. Markdown fences are not stripped.
///
/// The payload is decoded from the raw text rather than from the `Value`,
/// whose object keys are sorted; milestone timelines keep the provider's order.
pub fn parse_payload<T: StagePayload>(text: &str) -> Result<(Value, T), StepError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| StepError::malformed(format!("response is not valid JSON: {}", e), text))?;

    let payload = serde_json::from_str::<T>(text).map_err(|e| {
        StepError::malformed(
            format!("unexpected {} response shape: {}", T::STAGE, e),
            text,
        )
    })?;

    payload.validate().map_err(|reason| {
        StepError::malformed(format!("invalid {} response: {}", T::STAGE, reason), text)
    })?;

    Ok((value, payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MockCompletionClient, MockResponse, ModelConfig, ProviderError};
    use crate::pipeline::payloads::{FundingOutput, ScoringOutput, ValidationOutput};
    use crate::pipeline::stage::Stage;
    use serde_json::json;
    use std::sync::Arc;

    fn executor(mock: &Arc<MockCompletionClient>) -> StepExecutor {
        StepExecutor::new(PromptCompleter::new(mock.clone(), ModelConfig::default()))
    }

    #[tokio::test]
    async fn test_successful_step() {
        let mock = Arc::new(MockCompletionClient::new());
        mock.add_response(MockResponse::json(json!({
            "isValid": true,
            "sanitizedInput": "Bike repair subscriptions"
        })));

        let (result, payload) = executor(&mock)
            .run_typed::<ValidationOutput>(
                "{input}",
                &PromptVariables::new().with("input", "bike repair subs"),
                Duration::from_secs(5),
            )
            .await;

        assert!(result.is_success());
        assert_eq!(result.stage, Stage::Validation);
        assert_eq!(result.payload.unwrap()["isValid"], true);
        assert_eq!(payload.unwrap().sanitized_input, "Bike repair subscriptions");
    }

    #[tokio::test]
    async fn test_timeout_produces_timeout_error() {
        let mock = Arc::new(MockCompletionClient::new());
        mock.add_response(MockResponse::Pending);

        let result = executor(&mock)
            .run::<ValidationOutput>("{input}", &PromptVariables::new(), Duration::from_millis(50))
            .await;

        assert!(!result.is_success());
        assert!(result.payload.is_none());
        assert!(matches!(result.error, Some(StepError::Timeout { .. })));
        assert!(result.elapsed >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_markdown_fenced_json_is_malformed() {
        let mock = Arc::new(MockCompletionClient::new());
        mock.add_response(MockResponse::text("```json\n{\"isValid\": true}\n```"));

        let result = executor(&mock)
            .run::<ValidationOutput>("x", &PromptVariables::new(), Duration::from_secs(5))
            .await;

        match result.error {
            Some(StepError::MalformedResponse { raw_response, .. }) => {
                assert!(raw_response.starts_with("```json"));
            }
            other => panic!("expected malformed response, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_provider_error_is_wrapped() {
        let mock = Arc::new(MockCompletionClient::new());
        mock.add_response(MockResponse::error(ProviderError::AuthFailure {
            message: "invalid key".into(),
        }));

        let result = executor(&mock)
            .run::<ValidationOutput>("x", &PromptVariables::new(), Duration::from_secs(5))
            .await;

        assert!(matches!(
            result.error,
            Some(StepError::Provider(ProviderError::AuthFailure { .. }))
        ));
    }

    #[test]
    fn test_parse_payload_rejects_out_of_range_scores() {
        let text = json!({
            "scores": {
                "marketSize": 7, "competition": -1, "feasibility": 6,
                "monetization": 7, "scalability": 8
            },
            "pros": [], "cons": [], "benchmarkComparison": ""
        })
        .to_string();

        let err = parse_payload::<ScoringOutput>(&text).unwrap_err();
        match err {
            StepError::MalformedResponse { message, .. } => {
                assert!(message.contains("competition"), "{}", message)
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_payload_rejects_wrong_shape() {
        let err = parse_payload::<ValidationOutput>(r#"{"valid": "yes"}"#).unwrap_err();
        assert!(matches!(err, StepError::MalformedResponse { .. }));
    }

    #[test]
    fn test_parse_payload_keeps_milestone_order() {
        let text = r#"{"fundingStrategy":{"timeline":{"Month 4-6":"Seed","Month 1-3":"Angels"}}}"#;

        let (_, output) = parse_payload::<FundingOutput>(text).unwrap();

        assert_eq!(
            output.funding_strategy.timeline.display_lines(),
            vec!["Month 4-6: Seed".to_string(), "Month 1-3: Angels".to_string()]
        );
    }
}
