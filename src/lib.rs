//! ideaforge - LLM-driven startup idea analysis
//!
//! This library runs a free-text startup pitch through a fixed sequence of
//! five LLM stages and assembles their JSON answers into one structured
//! analysis:
//!
//! 1. **Validation** decides whether the text is a startup idea at all and
//!    produces a cleaned version of it. Invalid ideas get satirical feedback
//!    and the run stops here.
//! 2. **Scoring** rates market size, competition, feasibility, monetization
//!    and scalability on a 0-10 scale, plus pros, cons and a benchmark.
//! 3. **Improvement** suggests product-market fit, branding, pricing and MVP
//!    changes.
//! 4. **Funding** outlines investor types, a pitch and a timeline.
//! 5. **Launch** proposes early adopters, platforms, metrics and a 90-day plan.
//!
//! # Example Usage
//!
//! ```ignore
//! use ideaforge::{AnalysisService, IdeaForgeConfig};
//!
//! let config = IdeaForgeConfig::from_env()?;
//! let service = AnalysisService::new(&config)?;
//! let report = service
//!     .analyze("Peer-to-peer rental of camping gear for city dwellers", None)
//!     .await?;
//!
//! if let Some(feedback) = report.analysis.satirical_feedback() {
//!     println!("{}", feedback);
//! } else {
//!     println!("Overall: {}", report.analysis.scores().overall);
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`pipeline`]: Stage sequencing, per-stage timeouts and response parsing
//! - [`llm`]: Completion client trait and provider backends
//! - [`prompt`]: Stage prompt templates and placeholder rendering
//! - [`analysis`]: Result model and report envelope
//! - [`service`]: Input checks and error codes in front of the pipeline
//! - [`progress`]: Progress events and handlers

pub mod analysis;
pub mod cli;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod progress;
pub mod prompt;
pub mod service;
pub mod util;

pub use analysis::{AnalysisReport, ScoreCard, StartupAnalysis};
pub use config::{ConfigError, IdeaForgeConfig, Provider};
pub use llm::{CompletionClient, MockCompletionClient, ModelConfig, ProviderError};
pub use pipeline::{PipelineConfig, PipelineError, PipelineOrchestrator, Stage, StepError};
pub use progress::{ProgressEvent, ProgressFn, ProgressHandler};
pub use service::{AnalysisService, InputError, ServiceError};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_ideaforge() {
        assert_eq!(NAME, "ideaforge");
    }
}
