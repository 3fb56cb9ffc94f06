use super::completion::PromptCompleter;
use super::config::PipelineConfig;
use super::context::{PipelineContext, StepResult};
use super::error::{PipelineError, StepError};
use super::payloads::{
    FundingOutput, ImprovementOutput, LaunchOutput, ScoringOutput, StagePayload, ValidationOutput,
};
use super::stage::Stage;
use super::step::StepExecutor;
use crate::analysis::{InvalidIdea, StartupAnalysis, ValidAnalysis};
use crate::llm::{CompletionClient, ModelConfig};
use crate::progress::{notify, ProgressEvent, ProgressHandler};
use crate::prompt::PromptVariables;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Provider `overall` values further than this from the local score are logged
const OVERALL_DRIFT_TOLERANCE: f64 = 0.5;

/// Completed run: the analysis plus per-stage results
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub analysis: StartupAnalysis,
    pub steps: Vec<StepResult>,
    pub total_time: Duration,
}

/// Drives the five stages in order for one idea at a time
///
/// Holds no per-run state; concurrent `analyze` calls are independent.
#[derive(Debug, Clone)]
pub struct PipelineOrchestrator {
    executor: StepExecutor,
    config: PipelineConfig,
}

impl PipelineOrchestrator {
    pub fn new(client: Arc<dyn CompletionClient>, model: ModelConfig, config: PipelineConfig) -> Self {
        Self {
            executor: StepExecutor::new(PromptCompleter::new(client, model)),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn analyze(
        &self,
        idea: &str,
        progress: Option<Arc<dyn ProgressHandler>>,
    ) -> Result<StartupAnalysis, PipelineError> {
        self.run(idea, progress).await.map(|run| run.analysis)
    }

    pub async fn run(
        &self,
        idea: &str,
        progress: Option<Arc<dyn ProgressHandler>>,
    ) -> Result<PipelineRun, PipelineError> {
        let progress = progress.as_deref();
        let mut ctx = PipelineContext::new(idea);
        info!(input_chars = ctx.input().len(), "Starting startup analysis");

        let variables = PromptVariables::new().with("input", ctx.input());
        let validation: ValidationOutput = self.step(&mut ctx, variables, progress).await?;

        if !validation.is_valid {
            ctx.short_circuit();
            let total_time = ctx.elapsed();
            info!(
                total_time_ms = total_time.as_millis() as u64,
                "Input is not a startup idea, skipping analysis"
            );
            notify(progress, &ProgressEvent::ShortCircuited { total_time });

            let analysis = StartupAnalysis::Invalid(InvalidIdea {
                sanitized_input: ctx.input().to_string(),
                satirical_feedback: validation.satirical_feedback.unwrap_or_default(),
            });
            return Ok(PipelineRun {
                analysis,
                steps: ctx.into_results(),
                total_time,
            });
        }

        let sanitized_input = if validation.sanitized_input.trim().is_empty() {
            ctx.input().to_string()
        } else {
            validation.sanitized_input.trim().to_string()
        };

        let scoring: ScoringOutput = self
            .step(
                &mut ctx,
                PromptVariables::new()
                    .with("sanitizedInput", &sanitized_input)
                    .with("coreBusinessConcept", &validation.core_business_concept)
                    .with("targetMarket", &validation.target_market)
                    .with("valueProposition", &validation.value_proposition),
                progress,
            )
            .await?;

        let scores = scoring.scores.to_card();
        if let Some(reported) = scoring.scores.overall {
            if (reported - scores.overall).abs() > OVERALL_DRIFT_TOLERANCE {
                debug!(
                    reported,
                    computed = scores.overall,
                    "Provider overall score differs from weighted score"
                );
            }
        }

        let improvement: ImprovementOutput = self
            .step(
                &mut ctx,
                PromptVariables::new()
                    .with("sanitizedInput", &sanitized_input)
                    .with("overallScore", scores.overall)
                    .with("pros", &scoring.pros)
                    .with("cons", &scoring.cons),
                progress,
            )
            .await?;

        let funding: FundingOutput = self
            .step(
                &mut ctx,
                PromptVariables::new()
                    .with("sanitizedInput", &sanitized_input)
                    .with("overallScore", scores.overall)
                    .with("marketSize", scores.market_size)
                    .with("scalability", scores.scalability)
                    .with("improvements", &improvement.improvements),
                progress,
            )
            .await?;

        let launch: LaunchOutput = self
            .step(
                &mut ctx,
                PromptVariables::new()
                    .with("sanitizedInput", &sanitized_input)
                    .with("targetMarket", &validation.target_market)
                    .with("valueProposition", &validation.value_proposition)
                    .with("improvements", &improvement.improvements)
                    .with("fundingStrategy", &funding.funding_strategy),
                progress,
            )
            .await?;

        ctx.finish();
        let total_time = ctx.elapsed();
        info!(
            total_time_ms = total_time.as_millis() as u64,
            overall = scores.overall,
            "Startup analysis complete"
        );
        notify(progress, &ProgressEvent::Completed { total_time });

        let analysis = StartupAnalysis::Valid(Box::new(ValidAnalysis {
            sanitized_input,
            scores,
            pros: scoring.pros,
            cons: scoring.cons,
            benchmark_comparison: scoring.benchmark_comparison,
            improvements: improvement.improvements,
            funding_strategy: funding.funding_strategy,
            launch_plan: launch.launch_plan,
        }));

        Ok(PipelineRun {
            analysis,
            steps: ctx.into_results(),
            total_time,
        })
    }

    async fn step<T: StagePayload>(
        &self,
        ctx: &mut PipelineContext,
        variables: PromptVariables,
        progress: Option<&dyn ProgressHandler>,
    ) -> Result<T, PipelineError> {
        let stage = T::STAGE;
        ctx.enter(stage);
        info!(stage = %stage, "Step {}/5: {}", stage.index(), stage.label());
        notify(progress, &ProgressEvent::StageStarted { stage });

        let Some(timeout) = self.config.step_deadline(ctx.started()) else {
            let budget = self.config.pipeline_timeout.unwrap_or_default();
            let source = StepError::Timeout {
                seconds: budget.as_secs_f64(),
            };
            ctx.record(StepResult::failure(stage, source.clone(), Duration::ZERO));
            return Err(self.fail(stage, source, progress));
        };

        let (result, payload) = self
            .executor
            .run_typed::<T>(stage.template().text, &variables, timeout)
            .await;
        let elapsed = result.elapsed;
        ctx.record(result);

        match payload {
            Ok(payload) => {
                notify(progress, &ProgressEvent::StageCompleted { stage, elapsed });
                Ok(payload)
            }
            Err(source) => Err(self.fail(stage, source, progress)),
        }
    }

    fn fail(
        &self,
        stage: Stage,
        source: StepError,
        progress: Option<&dyn ProgressHandler>,
    ) -> PipelineError {
        let err = PipelineError::StageFailure { stage, source };
        warn!(stage = %stage, kind = %err.kind(), "{}", err);
        notify(
            progress,
            &ProgressEvent::Failed {
                stage,
                kind: err.kind(),
                error: err.step_error().to_string(),
            },
        );
        err
    }
}
