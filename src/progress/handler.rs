//! Progress handler trait and events

use crate::pipeline::{FailureKind, Stage};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;
use tracing::warn;

/// Events emitted while a pipeline run progresses
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// A stage is about to call the provider
    StageStarted { stage: Stage },

    /// A stage produced a valid payload
    StageCompleted { stage: Stage, elapsed: Duration },

    /// All five stages succeeded
    Completed { total_time: Duration },

    /// Validation judged the input invalid; no further stages run
    ShortCircuited { total_time: Duration },

    /// A stage failed and the run stopped
    Failed {
        stage: Stage,
        kind: FailureKind,
        error: String,
    },
}

/// Trait for handling progress events during a run
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

/// Adapts a `(stage index, label)` closure; only stage entries are forwarded
pub struct ProgressFn<F>(pub F);

impl<F> ProgressHandler for ProgressFn<F>
where
    F: Fn(usize, &str) + Send + Sync,
{
    fn on_progress(&self, event: &ProgressEvent) {
        if let ProgressEvent::StageStarted { stage } = event {
            (self.0)(stage.index(), stage.label());
        }
    }
}

/// Delivers an event, containing any panic raised by the handler
pub fn notify(handler: Option<&dyn ProgressHandler>, event: &ProgressEvent) {
    let Some(handler) = handler else {
        return;
    };

    if catch_unwind(AssertUnwindSafe(|| handler.on_progress(event))).is_err() {
        warn!(event = ?event, "Progress handler panicked; continuing");
    }
}
