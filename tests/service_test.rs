//! Analysis service tests
//!
//! Covers input rejection, the report envelope and the mapping from stage
//! failures to error codes.

use ideaforge::llm::{MockCompletionClient, MockResponse, ModelConfig, ProviderError};
use ideaforge::pipeline::{PipelineConfig, Stage};
use ideaforge::{AnalysisService, ServiceError};
use serde_json::{json, Value};
use std::sync::Arc;
use yare::parameterized;

fn service(mock: &Arc<MockCompletionClient>) -> AnalysisService {
    AnalysisService::with_client(mock.clone(), ModelConfig::default(), PipelineConfig::default())
}

fn valid_responses() -> Vec<MockResponse> {
    vec![
        MockResponse::json(json!({
            "isValid": true,
            "sanitizedInput": "On-demand tool library for apartment buildings",
            "coreBusinessConcept": "Shared tools",
            "targetMarket": "Renters",
            "valueProposition": "Borrow instead of buy"
        })),
        MockResponse::json(json!({
            "scores": {
                "marketSize": 6, "competition": 7, "feasibility": 8,
                "monetization": 5, "scalability": 6
            },
            "pros": ["Low capex per building"],
            "cons": ["Theft and damage"],
            "benchmarkComparison": "A neighborhood-scale Peerby"
        })),
        MockResponse::json(json!({"improvements": {"pricing": ["Building-wide subscription"]}})),
        MockResponse::json(json!({"fundingStrategy": {"timeline": "Raise pre-seed in Q1"}})),
        MockResponse::json(json!({"launchPlan": {"ninetyDayPlan": ["Pilot in two buildings"]}})),
    ]
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

#[parameterized(
    empty = { "", "INVALID_INPUT" },
    too_short = { "Uber for", "INPUT_TOO_SHORT" },
)]
fn test_rejected_input_makes_no_calls(input: &str, code: &str) {
    let mock = Arc::new(MockCompletionClient::new());
    mock.add_responses(valid_responses());

    let err = block_on(service(&mock).analyze(input, None)).unwrap_err();

    assert_eq!(err.code(), code);
    assert_eq!(err.status_code(), 400);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_too_long_input() {
    let mock = Arc::new(MockCompletionClient::new());
    let err = service(&mock)
        .analyze(&"x".repeat(2001), None)
        .await
        .unwrap_err();

    assert_eq!(err.code(), "INPUT_TOO_LONG");
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_report_envelope() {
    let mock = Arc::new(MockCompletionClient::new());
    mock.add_responses(valid_responses());

    let report = service(&mock)
        .analyze("An on-demand tool library for apartment buildings", None)
        .await
        .unwrap();

    assert!(report.success);
    assert!(report.analysis.is_valid());
    assert_eq!(report.metadata.version, "1.0");
    assert_eq!(report.metadata.stages.len(), 5);
    assert_eq!(report.metadata.stages[0].stage, Stage::Validation);
    assert!(!report.metadata.run_id.is_empty());

    let value: Value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["success"], true);
    assert!(value["metadata"]["processingTimeMs"].is_u64());
    assert!(value["metadata"]["timestamp"].is_string());
    assert_eq!(value["analysis"]["fundingStrategy"]["timeline"], "Raise pre-seed in Q1");
}

#[tokio::test]
async fn test_invalid_idea_report_is_success() {
    let mock = Arc::new(MockCompletionClient::new());
    mock.add_response(MockResponse::json(json!({
        "isValid": false,
        "satiricalFeedback": "Selling air to birds has limited upside."
    })));

    let report = service(&mock)
        .analyze("Selling bottled air to pigeons", None)
        .await
        .unwrap();

    assert!(report.success);
    assert!(!report.analysis.is_valid());
    assert_eq!(report.metadata.stages.len(), 1);

    let value: Value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["analysis"]["isValid"], false);
    assert_eq!(
        value["analysis"]["satiricalFeedback"],
        "Selling air to birds has limited upside."
    );
}

#[parameterized(
    auth = { ProviderError::AuthFailure { message: "invalid key".into() }, "API_KEY_ERROR" },
    rate = { ProviderError::RateLimited { retry_after: None }, "RATE_LIMIT_ERROR" },
    timeout = { ProviderError::Timeout { seconds: 30 }, "TIMEOUT_ERROR" },
    unknown = { ProviderError::unknown("connection reset"), "UNKNOWN_ERROR" },
)]
fn test_provider_failures_map_to_codes(error: ProviderError, code: &str) {
    let mock = Arc::new(MockCompletionClient::new());
    let mut responses = valid_responses();
    responses[1] = MockResponse::error(error);
    mock.add_responses(responses);

    let err = block_on(
        service(&mock).analyze("An on-demand tool library for apartment buildings", None),
    )
    .unwrap_err();

    assert_eq!(err.code(), code);
    assert_eq!(err.stage(), Some(Stage::Scoring));
    assert!(matches!(err, ServiceError::Pipeline(_)));
    assert_eq!(mock.call_count(), 2);
}
