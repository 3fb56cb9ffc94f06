//! Typed stage payloads
//!
//! Each stage's JSON response is deserialized into one of these types and
//! then checked with [`StagePayload::validate`]. Top-level sections and
//! numeric scores are required; list and text fields default to empty.

use super::stage::Stage;
use crate::analysis::{null_as_default, FundingStrategy, Improvements, LaunchPlan, ScoreCard};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// A parsed stage response
pub trait StagePayload: DeserializeOwned + Send + 'static {
    const STAGE: Stage;

    /// Semantic checks that serde cannot express
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutput {
    pub is_valid: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sanitized_input: String,
    #[serde(default)]
    pub satirical_feedback: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub core_business_concept: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub target_market: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value_proposition: String,
}

impl StagePayload for ValidationOutput {
    const STAGE: Stage = Stage::Validation;
}

/// Scores as the provider sent them; `overall` is optional and not trusted
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScores {
    pub market_size: f64,
    pub competition: f64,
    pub feasibility: f64,
    pub monetization: f64,
    pub scalability: f64,
    #[serde(default)]
    pub overall: Option<f64>,
}

impl RawScores {
    /// Score card with a locally computed `overall`
    pub fn to_card(&self) -> ScoreCard {
        ScoreCard::from_dimensions(
            self.market_size,
            self.competition,
            self.feasibility,
            self.monetization,
            self.scalability,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringOutput {
    pub scores: RawScores,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pros: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cons: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub benchmark_comparison: String,
}

impl StagePayload for ScoringOutput {
    const STAGE: Stage = Stage::Scoring;

    fn validate(&self) -> Result<(), String> {
        self.scores.to_card().check_range()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementOutput {
    pub improvements: Improvements,
}

impl StagePayload for ImprovementOutput {
    const STAGE: Stage = Stage::Improvement;
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingOutput {
    pub funding_strategy: FundingStrategy,
}

impl StagePayload for FundingOutput {
    const STAGE: Stage = Stage::Funding;
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchOutput {
    pub launch_plan: LaunchPlan,
}

impl StagePayload for LaunchOutput {
    const STAGE: Stage = Stage::Launch;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FundingTimeline;
    use serde_json::json;

    #[test]
    fn test_validation_requires_is_valid() {
        let err = serde_json::from_value::<ValidationOutput>(json!({
            "sanitizedInput": "x"
        }));
        assert!(err.is_err());
    }

    #[test]
    fn test_validation_tolerates_nulls() {
        let output: ValidationOutput = serde_json::from_value(json!({
            "isValid": false,
            "sanitizedInput": null,
            "satiricalFeedback": null,
            "coreBusinessConcept": null
        }))
        .unwrap();

        assert!(!output.is_valid);
        assert_eq!(output.sanitized_input, "");
        assert_eq!(output.satirical_feedback, None);
    }

    #[test]
    fn test_scoring_missing_dimension_is_rejected() {
        let result = serde_json::from_value::<ScoringOutput>(json!({
            "scores": {"marketSize": 7, "competition": 5, "feasibility": 6, "monetization": 7},
            "pros": [], "cons": []
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_scoring_validate_range() {
        let output: ScoringOutput = serde_json::from_value(json!({
            "scores": {
                "marketSize": 12, "competition": 5, "feasibility": 6,
                "monetization": 7, "scalability": 8
            }
        }))
        .unwrap();
        assert!(output.validate().is_err());
    }

    #[test]
    fn test_scoring_overall_is_recomputed() {
        let output: ScoringOutput = serde_json::from_value(json!({
            "scores": {
                "marketSize": 8, "competition": 6, "feasibility": 7,
                "monetization": 7, "scalability": 9, "overall": 3.0
            },
            "pros": ["fast"], "cons": ["crowded"],
            "benchmarkComparison": "Like Airbnb for tents"
        }))
        .unwrap();

        assert!(output.validate().is_ok());
        assert_eq!(output.scores.overall, Some(3.0));
        assert_eq!(output.scores.to_card().overall, 7.5);
    }

    #[test]
    fn test_section_payloads_require_their_section() {
        assert!(serde_json::from_value::<ImprovementOutput>(json!({})).is_err());
        assert!(serde_json::from_value::<FundingOutput>(json!({"funding": {}})).is_err());
        assert!(serde_json::from_value::<LaunchOutput>(json!({"launchPlan": []})).is_err());
    }

    #[test]
    fn test_funding_output_with_milestones() {
        let output: FundingOutput = serde_json::from_value(json!({
            "fundingStrategy": {
                "investorTypes": ["Angels"],
                "timeline": {"Month 1": "Friends and family", "Month 6": "Seed"}
            }
        }))
        .unwrap();

        assert!(matches!(
            output.funding_strategy.timeline,
            FundingTimeline::Milestones(_)
        ));
        assert!(output.funding_strategy.pitch_outline.is_empty());
    }

    #[test]
    fn test_null_branding_is_empty() {
        let output: ImprovementOutput = serde_json::from_str(
            r#"{"improvements": {"branding": null, "mvpFeatures": ["Booking calendar"]}}"#,
        )
        .unwrap();

        assert!(output.improvements.branding.is_empty());
        assert_eq!(output.improvements.mvp_features, vec!["Booking calendar".to_string()]);
    }

    #[test]
    fn test_null_timeline_is_empty_summary() {
        let output: FundingOutput = serde_json::from_str(
            r#"{"fundingStrategy": {"timeline": null, "networkingTips": null}}"#,
        )
        .unwrap();

        assert_eq!(output.funding_strategy.timeline, FundingTimeline::default());
        assert!(output.funding_strategy.timeline.display_lines().is_empty());
        assert!(output.funding_strategy.networking_tips.is_empty());
    }

    #[test]
    fn test_null_launch_lists_are_empty() {
        let output: LaunchOutput = serde_json::from_str(
            r#"{"launchPlan": {"earlyAdopters":null, "ninetyDayPlan":null, "keyMetrics":["WAU"]}}"#,
        )
        .unwrap();

        assert!(output.launch_plan.early_adopters.is_empty());
        assert!(output.launch_plan.ninety_day_plan.is_empty());
        assert_eq!(output.launch_plan.key_metrics, vec!["WAU".to_string()]);
    }

    #[test]
    fn test_null_section_is_still_rejected() {
        assert!(serde_json::from_str::<ImprovementOutput>(r#"{"improvements": null}"#).is_err());
    }
}
