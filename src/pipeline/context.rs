//! Per-run pipeline state

use super::error::StepError;
use super::stage::Stage;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelineState {
    Pending,
    Running(Stage),
    Done,
    ShortCircuited,
    Failed(Stage),
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PipelineState::Done | PipelineState::ShortCircuited | PipelineState::Failed(_)
        )
    }
}

/// Outcome of one stage; exactly one of `payload` and `error` is set
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub stage: Stage,
    pub payload: Option<Value>,
    pub error: Option<StepError>,
    pub elapsed: Duration,
}

impl StepResult {
    pub fn success(stage: Stage, payload: Value, elapsed: Duration) -> Self {
        Self {
            stage,
            payload: Some(payload),
            error: None,
            elapsed,
        }
    }

    pub fn failure(stage: Stage, error: StepError, elapsed: Duration) -> Self {
        Self {
            stage,
            payload: None,
            error: Some(error),
            elapsed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// State owned by a single pipeline run
#[derive(Debug)]
pub struct PipelineContext {
    input: String,
    state: PipelineState,
    results: Vec<StepResult>,
    started: Instant,
}

impl PipelineContext {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.trim().to_string(),
            state: PipelineState::Pending,
            results: Vec::with_capacity(Stage::COUNT),
            started: Instant::now(),
        }
    }

    /// The caller's idea, trimmed
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// 1-based index of the running (or failed) stage, 0 before the first stage
    pub fn current_index(&self) -> usize {
        match self.state {
            PipelineState::Running(stage) | PipelineState::Failed(stage) => stage.index(),
            PipelineState::Pending => 0,
            PipelineState::Done | PipelineState::ShortCircuited => {
                self.results.last().map(|r| r.stage.index()).unwrap_or(0)
            }
        }
    }

    pub fn results(&self) -> &[StepResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<StepResult> {
        self.results
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub(crate) fn enter(&mut self, stage: Stage) {
        self.state = PipelineState::Running(stage);
    }

    pub(crate) fn record(&mut self, result: StepResult) {
        if !result.is_success() {
            self.state = PipelineState::Failed(result.stage);
        }
        self.results.push(result);
    }

    pub(crate) fn short_circuit(&mut self) {
        self.state = PipelineState::ShortCircuited;
    }

    pub(crate) fn finish(&mut self) {
        self.state = PipelineState::Done;
    }
}
