//! Analysis output model and report envelope

mod report;
mod types;

pub(crate) use types::null_as_default;
pub use report::{AnalysisReport, ReportMetadata, StageTiming, REPORT_VERSION};
pub use types::{
    FundingStrategy, FundingTimeline, Improvements, InvalidIdea, LaunchPlan, Milestone, Milestones,
    PlanAction, ScoreCard, StartupAnalysis, ValidAnalysis, MAX_SCORE, MIN_SCORE, SCORE_WEIGHTS,
};
