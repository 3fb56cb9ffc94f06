//! Startup analysis output model
//!
//! [`StartupAnalysis`] is an enum in Rust but serializes to one uniform,
//! camelCase wire shape: the invalid variant carries zeroed scores and empty
//! sections so consumers never have to branch on field presence.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Lowest score a dimension can take
pub const MIN_SCORE: f64 = 0.0;

/// Highest score a dimension can take
pub const MAX_SCORE: f64 = 10.0;

/// Weights used for the overall score, in dimension order
/// (market size, competition, feasibility, monetization, scalability)
pub const SCORE_WEIGHTS: [f64; 5] = [0.25, 0.15, 0.20, 0.20, 0.20];

/// Treats an explicit `null` like a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Five dimension scores and their weighted composite
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCard {
    pub market_size: f64,
    pub competition: f64,
    pub feasibility: f64,
    pub monetization: f64,
    pub scalability: f64,
    pub overall: f64,
}

impl ScoreCard {
    /// Builds a score card and computes `overall` from [`SCORE_WEIGHTS`],
    /// rounded to one decimal.
    pub fn from_dimensions(
        market_size: f64,
        competition: f64,
        feasibility: f64,
        monetization: f64,
        scalability: f64,
    ) -> Self {
        let mut card = Self {
            market_size,
            competition,
            feasibility,
            monetization,
            scalability,
            overall: 0.0,
        };
        card.overall = card.weighted_overall();
        card
    }

    pub fn weighted_overall(&self) -> f64 {
        let raw: f64 = self
            .dimensions()
            .iter()
            .zip(SCORE_WEIGHTS.iter())
            .map(|((_, score), weight)| score * weight)
            .sum();
        (raw * 10.0).round() / 10.0
    }

    /// Dimension names (wire spelling) and values, excluding `overall`
    pub fn dimensions(&self) -> [(&'static str, f64); 5] {
        [
            ("marketSize", self.market_size),
            ("competition", self.competition),
            ("feasibility", self.feasibility),
            ("monetization", self.monetization),
            ("scalability", self.scalability),
        ]
    }

    /// Checks that every score, `overall` included, is finite and within range
    pub fn check_range(&self) -> Result<(), String> {
        let all = self
            .dimensions()
            .into_iter()
            .chain(std::iter::once(("overall", self.overall)));
        for (name, value) in all {
            if !value.is_finite() || !(MIN_SCORE..=MAX_SCORE).contains(&value) {
                return Err(format!(
                    "score '{}' is {} (expected {}..={})",
                    name, value, MIN_SCORE, MAX_SCORE
                ));
            }
        }
        Ok(())
    }
}

/// Categorized improvement suggestions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Improvements {
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_market_fit: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub branding: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pricing: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mvp_features: Vec<String>,
}

impl Improvements {
    pub fn is_empty(&self) -> bool {
        self.product_market_fit.is_empty()
            && self.branding.is_empty()
            && self.pricing.is_empty()
            && self.mvp_features.is_empty()
    }
}

/// Fundraising plan
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingStrategy {
    #[serde(default, deserialize_with = "null_as_default")]
    pub investor_types: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pitch_outline: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub specific_investors: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub networking_tips: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timeline: FundingTimeline,
}

impl FundingStrategy {
    pub fn is_empty(&self) -> bool {
        self.investor_types.is_empty()
            && self.pitch_outline.is_empty()
            && self.specific_investors.is_empty()
            && self.networking_tips.is_empty()
            && self.timeline.is_empty()
    }
}

/// Fundraising timeline as the provider chose to express it
///
/// Display normalization ([`FundingTimeline::display_lines`]):
/// - `Summary`: the text as one line
/// - `Phases`: one line per phase
/// - `Milestones`: one `"period: description"` line per entry, in provider order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FundingTimeline {
    Summary(String),
    Phases(Vec<String>),
    Milestones(Milestones),
}

impl Default for FundingTimeline {
    fn default() -> Self {
        FundingTimeline::Summary(String::new())
    }
}

impl FundingTimeline {
    pub fn is_empty(&self) -> bool {
        match self {
            FundingTimeline::Summary(text) => text.trim().is_empty(),
            FundingTimeline::Phases(phases) => phases.is_empty(),
            FundingTimeline::Milestones(milestones) => milestones.0.is_empty(),
        }
    }

    pub fn display_lines(&self) -> Vec<String> {
        match self {
            FundingTimeline::Summary(text) if text.trim().is_empty() => Vec::new(),
            FundingTimeline::Summary(text) => vec![text.clone()],
            FundingTimeline::Phases(phases) => phases.clone(),
            FundingTimeline::Milestones(milestones) => milestones
                .0
                .iter()
                .map(|m| format!("{}: {}", m.period, m.description))
                .collect(),
        }
    }
}

/// One `period -> description` entry of a milestone timeline
#[derive(Debug, Clone, PartialEq)]
pub struct Milestone {
    pub period: String,
    pub description: String,
}

/// Ordered milestone map; serializes as a JSON object in insertion order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Milestones(pub Vec<Milestone>);

impl Serialize for Milestones {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for milestone in &self.0 {
            map.serialize_entry(&milestone.period, &milestone.description)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Milestones {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MilestonesVisitor;

        impl<'de> Visitor<'de> for MilestonesVisitor {
            type Value = Milestones;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of period to description")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Milestones, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((period, description)) =
                    access.next_entry::<String, TextOrList>()?
                {
                    entries.push(Milestone {
                        period,
                        description: description.into_text(),
                    });
                }
                Ok(Milestones(entries))
            }
        }

        deserializer.deserialize_map(MilestonesVisitor)
    }
}

/// Provider text that sometimes arrives as a list of fragments
#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrList {
    Text(String),
    List(Vec<String>),
}

impl TextOrList {
    fn into_text(self) -> String {
        match self {
            TextOrList::Text(text) => text,
            TextOrList::List(items) => items.join("; "),
        }
    }
}

fn text_or_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    TextOrList::deserialize(deserializer).map(TextOrList::into_text)
}

/// One entry of the 90-day plan
///
/// Display normalization: `Step` shows its text, `Scheduled` shows
/// `"timeline: actions"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanAction {
    Step(String),
    Scheduled {
        timeline: String,
        #[serde(deserialize_with = "text_or_list")]
        actions: String,
    },
}

impl PlanAction {
    pub fn display_text(&self) -> String {
        match self {
            PlanAction::Step(text) => text.clone(),
            PlanAction::Scheduled { timeline, actions } => format!("{}: {}", timeline, actions),
        }
    }
}

/// Go-to-market plan
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchPlan {
    #[serde(default, deserialize_with = "null_as_default")]
    pub early_adopters: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub launch_platforms: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub community_building: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key_metrics: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ninety_day_plan: Vec<PlanAction>,
}

impl LaunchPlan {
    pub fn is_empty(&self) -> bool {
        self.early_adopters.is_empty()
            && self.launch_platforms.is_empty()
            && self.community_building.is_empty()
            && self.key_metrics.is_empty()
            && self.ninety_day_plan.is_empty()
    }
}

/// Verdict for input that is not a real startup idea
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InvalidIdea {
    pub sanitized_input: String,
    pub satirical_feedback: String,
}

/// Complete analysis of a valid idea
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidAnalysis {
    pub sanitized_input: String,
    pub scores: ScoreCard,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub benchmark_comparison: String,
    pub improvements: Improvements,
    pub funding_strategy: FundingStrategy,
    pub launch_plan: LaunchPlan,
}

/// Terminal pipeline output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "AnalysisWire", from = "AnalysisWire")]
pub enum StartupAnalysis {
    Invalid(InvalidIdea),
    Valid(Box<ValidAnalysis>),
}

impl StartupAnalysis {
    pub fn is_valid(&self) -> bool {
        matches!(self, StartupAnalysis::Valid(_))
    }

    pub fn sanitized_input(&self) -> &str {
        match self {
            StartupAnalysis::Invalid(invalid) => &invalid.sanitized_input,
            StartupAnalysis::Valid(valid) => &valid.sanitized_input,
        }
    }

    pub fn satirical_feedback(&self) -> Option<&str> {
        match self {
            StartupAnalysis::Invalid(invalid) => Some(&invalid.satirical_feedback),
            StartupAnalysis::Valid(_) => None,
        }
    }

    /// Scores of a valid analysis; all zero for an invalid one
    pub fn scores(&self) -> ScoreCard {
        match self {
            StartupAnalysis::Invalid(_) => ScoreCard::default(),
            StartupAnalysis::Valid(valid) => valid.scores,
        }
    }

    pub fn as_valid(&self) -> Option<&ValidAnalysis> {
        match self {
            StartupAnalysis::Invalid(_) => None,
            StartupAnalysis::Valid(valid) => Some(valid),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisWire {
    is_valid: bool,
    #[serde(default)]
    sanitized_input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    satirical_feedback: Option<String>,
    #[serde(default)]
    scores: ScoreCard,
    #[serde(default)]
    pros: Vec<String>,
    #[serde(default)]
    cons: Vec<String>,
    #[serde(default)]
    benchmark_comparison: String,
    #[serde(default)]
    improvements: Improvements,
    #[serde(default)]
    funding_strategy: FundingStrategy,
    #[serde(default)]
    launch_plan: LaunchPlan,
}

impl From<StartupAnalysis> for AnalysisWire {
    fn from(analysis: StartupAnalysis) -> Self {
        match analysis {
            StartupAnalysis::Invalid(invalid) => AnalysisWire {
                is_valid: false,
                sanitized_input: invalid.sanitized_input,
                satirical_feedback: Some(invalid.satirical_feedback),
                scores: ScoreCard::default(),
                pros: Vec::new(),
                cons: Vec::new(),
                benchmark_comparison: String::new(),
                improvements: Improvements::default(),
                funding_strategy: FundingStrategy::default(),
                launch_plan: LaunchPlan::default(),
            },
            StartupAnalysis::Valid(valid) => {
                let valid = *valid;
                AnalysisWire {
                    is_valid: true,
                    sanitized_input: valid.sanitized_input,
                    satirical_feedback: None,
                    scores: valid.scores,
                    pros: valid.pros,
                    cons: valid.cons,
                    benchmark_comparison: valid.benchmark_comparison,
                    improvements: valid.improvements,
                    funding_strategy: valid.funding_strategy,
                    launch_plan: valid.launch_plan,
                }
            }
        }
    }
}

impl From<AnalysisWire> for StartupAnalysis {
    fn from(wire: AnalysisWire) -> Self {
        if !wire.is_valid {
            return StartupAnalysis::Invalid(InvalidIdea {
                sanitized_input: wire.sanitized_input,
                satirical_feedback: wire.satirical_feedback.unwrap_or_default(),
            });
        }

        StartupAnalysis::Valid(Box::new(ValidAnalysis {
            sanitized_input: wire.sanitized_input,
            scores: wire.scores,
            pros: wire.pros,
            cons: wire.cons,
            benchmark_comparison: wire.benchmark_comparison,
            improvements: wire.improvements,
            funding_strategy: wire.funding_strategy,
            launch_plan: wire.launch_plan,
        }))
    }
}
