//! Pipeline error types

use super::stage::Stage;
use crate::llm::ProviderError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Raw responses longer than this are truncated in error values
const RAW_RESPONSE_LIMIT: usize = 2000;

/// Failure of a single stage
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StepError {
    #[error("timed out after {seconds:.1}s")]
    Timeout { seconds: f64 },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("malformed response: {message}")]
    MalformedResponse {
        message: String,
        raw_response: String,
    },
}

impl StepError {
    pub fn malformed(message: impl Into<String>, raw_response: &str) -> Self {
        let raw_response = if raw_response.len() > RAW_RESPONSE_LIMIT {
            let mut end = RAW_RESPONSE_LIMIT;
            while !raw_response.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &raw_response[..end])
        } else {
            raw_response.to_string()
        };

        StepError::MalformedResponse {
            message: message.into(),
            raw_response,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            StepError::Timeout { .. } => FailureKind::Timeout,
            StepError::MalformedResponse { .. } => FailureKind::MalformedResponse,
            StepError::Provider(provider) => match provider {
                ProviderError::Timeout { .. } => FailureKind::Timeout,
                ProviderError::AuthFailure { .. } => FailureKind::AuthFailure,
                ProviderError::RateLimited { .. } => FailureKind::RateLimited,
                ProviderError::Unknown { .. } => FailureKind::Unknown,
            },
        }
    }
}

/// Failure of a pipeline run
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("[Step {} {}] {source}", stage.index(), stage.name())]
    StageFailure {
        stage: Stage,
        #[source]
        source: StepError,
    },
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::StageFailure { stage, .. } => *stage,
        }
    }

    pub fn step_error(&self) -> &StepError {
        match self {
            PipelineError::StageFailure { source, .. } => source,
        }
    }

    pub fn kind(&self) -> FailureKind {
        self.step_error().kind()
    }
}

/// Structural failure category, independent of message text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    AuthFailure,
    RateLimited,
    MalformedResponse,
    Unknown,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FailureKind::Timeout => "timeout",
            FailureKind::AuthFailure => "auth failure",
            FailureKind::RateLimited => "rate limited",
            FailureKind::MalformedResponse => "malformed response",
            FailureKind::Unknown => "unknown",
        };
        f.write_str(text)
    }
}
