//! Five-stage startup analysis pipeline
//!
//! Validation judges the input; Scoring, Improvement, Funding and Launch
//! build on each other's parsed payloads. Stages run strictly in order, each
//! with one attempt under its own deadline. An invalid verdict at Validation
//! ends the run early with [`StartupAnalysis::Invalid`](crate::analysis::StartupAnalysis).

pub mod completion;
pub mod config;
pub mod context;
pub mod error;
pub mod orchestrator;
pub mod payloads;
pub mod stage;
pub mod step;

pub use completion::PromptCompleter;
pub use config::{PipelineConfig, DEFAULT_STEP_TIMEOUT};
pub use context::{PipelineContext, PipelineState, StepResult};
pub use error::{FailureKind, PipelineError, StepError};
pub use orchestrator::{PipelineOrchestrator, PipelineRun};
pub use payloads::StagePayload;
pub use stage::Stage;
pub use step::StepExecutor;
