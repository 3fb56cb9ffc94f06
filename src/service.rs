//! Analysis service
//!
//! This module provides the high-level `AnalysisService` that sits in front of
//! the pipeline:
//! 1. Checks the caller's input (present, 10..=2000 characters)
//! 2. Runs the five-stage pipeline
//! 3. Tracks timing and wraps the result in an [`AnalysisReport`]
//! 4. Maps every failure to a stable error code and HTTP-style status
//!
//! # Example
//!
//! ```no_run
//! use ideaforge::{AnalysisService, IdeaForgeConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = IdeaForgeConfig::from_env()?;
//! let service = AnalysisService::new(&config)?;
//!
//! let report = service
//!     .analyze("A subscription service for refurbished office chairs", None)
//!     .await?;
//! println!("Overall: {}", report.analysis.scores().overall);
//! # Ok(())
//! # }
//! ```

use crate::analysis::AnalysisReport;
use crate::config::{ConfigError, IdeaForgeConfig};
use crate::llm::{CompletionClient, ModelConfig};
use crate::pipeline::{
    FailureKind, PipelineConfig, PipelineError, PipelineOrchestrator, Stage,
};
use crate::progress::ProgressHandler;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Shortest accepted idea, in characters after trimming
pub const MIN_INPUT_CHARS: usize = 10;

/// Longest accepted idea, in characters
pub const MAX_INPUT_CHARS: usize = 2000;

/// Rejections of the caller's input before any provider call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Missing startup idea")]
    Empty,

    #[error("Startup idea is too short ({chars} characters, minimum {MIN_INPUT_CHARS})")]
    TooShort { chars: usize },

    #[error("Startup idea is too long ({chars} characters, maximum {MAX_INPUT_CHARS})")]
    TooLong { chars: usize },
}

/// Checks an idea against the length limits
pub fn validate_input(raw: &str) -> Result<(), InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty);
    }

    let trimmed_chars = trimmed.chars().count();
    if trimmed_chars < MIN_INPUT_CHARS {
        return Err(InputError::TooShort {
            chars: trimmed_chars,
        });
    }

    let chars = raw.chars().count();
    if chars > MAX_INPUT_CHARS {
        return Err(InputError::TooLong { chars });
    }

    Ok(())
}

/// Errors surfaced by the analysis service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Analysis failed: {0}")]
    Pipeline(#[from] PipelineError),
}

impl ServiceError {
    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Input(InputError::Empty) => "INVALID_INPUT",
            ServiceError::Input(InputError::TooShort { .. }) => "INPUT_TOO_SHORT",
            ServiceError::Input(InputError::TooLong { .. }) => "INPUT_TOO_LONG",
            ServiceError::Configuration(_) => "CONFIGURATION_ERROR",
            ServiceError::Pipeline(e) => match e.kind() {
                FailureKind::Timeout => "TIMEOUT_ERROR",
                FailureKind::AuthFailure => "API_KEY_ERROR",
                FailureKind::RateLimited => "RATE_LIMIT_ERROR",
                FailureKind::MalformedResponse => "CHAIN_ERROR",
                FailureKind::Unknown => "UNKNOWN_ERROR",
            },
        }
    }

    /// HTTP-style status for the failure
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Input(_) => 400,
            ServiceError::Configuration(_) => 500,
            ServiceError::Pipeline(e) => match e.kind() {
                FailureKind::Timeout => 504,
                FailureKind::AuthFailure => 503,
                FailureKind::RateLimited => 429,
                FailureKind::MalformedResponse => 422,
                FailureKind::Unknown => 500,
            },
        }
    }

    /// Stage that failed, for pipeline errors
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ServiceError::Pipeline(e) => Some(e.stage()),
            _ => None,
        }
    }

    /// Returns a user-friendly error message with troubleshooting hints
    pub fn help_message(&self) -> String {
        match self {
            ServiceError::Input(InputError::Empty) => {
                "Error: Missing startup idea\n\n\
                Help: Provide a description of your startup concept as an argument,\n\
                with --file, or on stdin."
                    .to_string()
            }
            ServiceError::Input(InputError::TooShort { chars }) => format!(
                "Error: Startup idea is too short ({} characters)\n\n\
                Help: Describe the concept in at least a sentence or two \
                (minimum {} characters).",
                chars, MIN_INPUT_CHARS
            ),
            ServiceError::Input(InputError::TooLong { chars }) => format!(
                "Error: Startup idea is too long ({} characters)\n\n\
                Help: Keep the description under {} characters.",
                chars, MAX_INPUT_CHARS
            ),
            ServiceError::Configuration(ConfigError::MissingCredential { variable }) => format!(
                "Error: Provider credential not configured\n\n\
                Help: Set the API key before running an analysis:\n\
                export {}=your-key-here\n\n\
                Or switch provider: IDEAFORGE_PROVIDER=<groq|openai|anthropic|gemini|ollama>",
                variable
            ),
            ServiceError::Configuration(e) => format!(
                "Error: Configuration error\n\n\
                Help: Configuration validation failed. Check the IDEAFORGE_* \
                environment variables (run `ideaforge config` to inspect them).\n\n\
                Details: {}",
                e
            ),
            ServiceError::Pipeline(e) => {
                let hint = match e.kind() {
                    FailureKind::Timeout => {
                        "The provider took too long. Try:\n\
                        - Increase the stage timeout: --step-timeout 60\n\
                        - Use a shorter description\n\
                        - Check network connectivity"
                    }
                    FailureKind::AuthFailure => {
                        "The provider rejected the credential. Try:\n\
                        - Check the API key is correct and has not expired\n\
                        - Check the key matches the selected provider"
                    }
                    FailureKind::RateLimited => {
                        "The provider is rate limiting requests. Wait a moment and retry."
                    }
                    FailureKind::MalformedResponse => {
                        "The model returned a response that could not be parsed. Try:\n\
                        - Retry the analysis\n\
                        - Use a different model: --model <name>"
                    }
                    FailureKind::Unknown => {
                        "The provider call failed. Try:\n\
                        - Retry the analysis\n\
                        - Check the provider status page"
                    }
                };
                format!("Error: Analysis failed\n\nHelp: {}\n\nDetails: {}", hint, e)
            }
        }
    }
}

/// High-level analysis service
///
/// Thread-safe; share it across tasks behind an `Arc` or clone it.
#[derive(Debug, Clone)]
pub struct AnalysisService {
    orchestrator: PipelineOrchestrator,
}

impl AnalysisService {
    /// Creates a service from configuration, failing fast when the provider
    /// credential is missing.
    pub fn new(config: &IdeaForgeConfig) -> Result<Self, ServiceError> {
        info!("Initializing analysis service");
        config.validate()?;
        config.require_credentials()?;

        let client = config.create_client()?;
        info!(
            backend = client.name(),
            model = %config.model,
            "Analysis service initialized"
        );

        Ok(Self::with_client(
            client,
            config.model_config(),
            config.pipeline_config(),
        ))
    }

    /// Creates a service around an existing client
    pub fn with_client(
        client: Arc<dyn CompletionClient>,
        model: ModelConfig,
        pipeline: PipelineConfig,
    ) -> Self {
        Self {
            orchestrator: PipelineOrchestrator::new(client, model, pipeline),
        }
    }

    pub fn orchestrator(&self) -> &PipelineOrchestrator {
        &self.orchestrator
    }

    /// Validates the idea, runs the pipeline and wraps the result in a report
    pub async fn analyze(
        &self,
        raw: &str,
        progress: Option<Arc<dyn ProgressHandler>>,
    ) -> Result<AnalysisReport, ServiceError> {
        validate_input(raw)?;

        let run_id = Uuid::new_v4().to_string();
        let preview: String = raw.trim().chars().take(100).collect();
        info!(run_id = %run_id, idea = %preview, "Starting analysis run");

        let start = Instant::now();
        let run = self.orchestrator.run(raw, progress).await.map_err(|e| {
            warn!(run_id = %run_id, code = %e.kind(), "Analysis run failed: {}", e);
            ServiceError::from(e)
        })?;
        let processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            run_id = %run_id,
            valid = run.analysis.is_valid(),
            processing_time_ms,
            "Analysis run complete"
        );

        Ok(AnalysisReport::from_run(run, run_id, processing_time_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ProviderError;
    use crate::pipeline::StepError;
    use yare::parameterized;

    #[parameterized(
        empty = { "", "INVALID_INPUT" },
        whitespace = { "   \n\t ", "INVALID_INPUT" },
        short = { "  tiny app ", "INPUT_TOO_SHORT" },
    )]
    fn test_input_rejections(input: &str, code: &str) {
        let err = ServiceError::from(validate_input(input).unwrap_err());
        assert_eq!(err.code(), code);
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_input_limits() {
        assert!(validate_input("0123456789").is_ok());
        assert!(validate_input(&"a".repeat(MAX_INPUT_CHARS)).is_ok());
        assert_eq!(
            validate_input(&"a".repeat(MAX_INPUT_CHARS + 1)),
            Err(InputError::TooLong {
                chars: MAX_INPUT_CHARS + 1
            })
        );
        // Multi-byte characters count once
        assert!(validate_input("épicerie à vélo").is_ok());
    }

    fn stage_failure(source: StepError) -> ServiceError {
        ServiceError::Pipeline(PipelineError::StageFailure {
            stage: Stage::Improvement,
            source,
        })
    }

    #[parameterized(
        timeout = { StepError::Timeout { seconds: 30.0 }, "TIMEOUT_ERROR", 504 },
        provider_timeout = { StepError::Provider(ProviderError::Timeout { seconds: 30 }), "TIMEOUT_ERROR", 504 },
        auth = { StepError::Provider(ProviderError::AuthFailure { message: "bad".into() }), "API_KEY_ERROR", 503 },
        rate = { StepError::Provider(ProviderError::RateLimited { retry_after: None }), "RATE_LIMIT_ERROR", 429 },
        malformed = { StepError::malformed("not json", "oops"), "CHAIN_ERROR", 422 },
        unknown = { StepError::Provider(ProviderError::unknown("boom")), "UNKNOWN_ERROR", 500 },
    )]
    fn test_pipeline_error_mapping(source: StepError, code: &str, status: u16) {
        let err = stage_failure(source);
        assert_eq!(err.code(), code);
        assert_eq!(err.status_code(), status);
        assert_eq!(err.stage(), Some(Stage::Improvement));
        assert!(err.help_message().contains("[Step 3 Improvement]"));
    }

    #[test]
    fn test_configuration_error_mapping() {
        let err = ServiceError::from(ConfigError::MissingCredential {
            variable: "GROQ_API_KEY".to_string(),
        });
        assert_eq!(err.code(), "CONFIGURATION_ERROR");
        assert_eq!(err.status_code(), 500);
        assert!(err.help_message().contains("export GROQ_API_KEY"));
        assert_eq!(err.stage(), None);
    }

    #[test]
    fn test_new_fails_fast_without_credential() {
        let config = IdeaForgeConfig::default();
        let err = AnalysisService::new(&config).unwrap_err();
        assert_eq!(err.code(), "CONFIGURATION_ERROR");
    }
}
