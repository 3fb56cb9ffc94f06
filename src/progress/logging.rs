//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::StageStarted { stage } => {
                info!(
                    stage = %stage,
                    progress = format!("{}/5", stage.index()),
                    "{}",
                    stage.label()
                );
            }
            ProgressEvent::StageCompleted { stage, elapsed } => {
                info!(
                    stage = %stage,
                    duration_ms = elapsed.as_millis() as u64,
                    "Stage complete"
                );
            }
            ProgressEvent::Completed { total_time } => {
                info!(
                    total_time_ms = total_time.as_millis() as u64,
                    "Analysis complete"
                );
            }
            ProgressEvent::ShortCircuited { total_time } => {
                info!(
                    total_time_ms = total_time.as_millis() as u64,
                    "Idea judged invalid, skipping remaining stages"
                );
            }
            ProgressEvent::Failed { stage, kind, error } => {
                warn!(stage = %stage, kind = %kind, error = %error, "Analysis failed");
            }
        }
    }
}
