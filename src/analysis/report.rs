//! Report envelope returned by the service layer

use super::types::StartupAnalysis;
use crate::pipeline::{PipelineRun, Stage, StepResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version of the report envelope format
pub const REPORT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub success: bool,
    pub analysis: StartupAnalysis,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub run_id: String,
    pub processing_time_ms: u64,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub stages: Vec<StageTiming>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub stage: Stage,
    pub elapsed_ms: u64,
}

impl From<&StepResult> for StageTiming {
    fn from(step: &StepResult) -> Self {
        Self {
            stage: step.stage,
            elapsed_ms: step.elapsed.as_millis() as u64,
        }
    }
}

impl AnalysisReport {
    pub fn from_run(run: PipelineRun, run_id: impl Into<String>, processing_time_ms: u64) -> Self {
        Self {
            success: true,
            metadata: ReportMetadata {
                run_id: run_id.into(),
                processing_time_ms,
                timestamp: Utc::now(),
                version: REPORT_VERSION.to_string(),
                stages: run.steps.iter().map(StageTiming::from).collect(),
            },
            analysis: run.analysis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::InvalidIdea;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_report_envelope_shape() {
        let run = PipelineRun {
            analysis: StartupAnalysis::Invalid(InvalidIdea {
                sanitized_input: "purple monkey dishwasher".into(),
                satirical_feedback: "Investors love dishwashers.".into(),
            }),
            steps: vec![StepResult::success(
                Stage::Validation,
                json!({"isValid": false}),
                Duration::from_millis(42),
            )],
            total_time: Duration::from_millis(45),
        };

        let report = AnalysisReport::from_run(run, "run-1", 45);
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["analysis"]["isValid"], false);
        assert_eq!(value["metadata"]["runId"], "run-1");
        assert_eq!(value["metadata"]["processingTimeMs"], 45);
        assert_eq!(value["metadata"]["version"], "1.0");
        assert_eq!(
            value["metadata"]["stages"],
            json!([{"stage": "Validation", "elapsedMs": 42}])
        );
        assert!(value["metadata"]["timestamp"].as_str().unwrap().contains('T'));

        let back: AnalysisReport = serde_json::from_value(value).unwrap();
        assert_eq!(back, report);
    }
}
