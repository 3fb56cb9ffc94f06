//! Command handlers
//!
//! Each handler returns the process exit code:
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Report produced (including ideas judged invalid) |
//! | 1 | I/O failure reading the idea or writing the output |
//! | 2 | Input rejected (empty, too short, too long) |
//! | 3 | Configuration error |
//! | 4 | A pipeline stage failed |

use super::commands::{AnalyzeArgs, ConfigArgs, TemplatesArgs};
use super::output::{format_templates, OutputFormat, OutputFormatter};
use crate::config::IdeaForgeConfig;
use crate::pipeline::{PipelineError, Stage};
use crate::progress::{LoggingHandler, ProgressEvent, ProgressHandler};
use crate::prompt::{all_templates, template_for, PromptTemplate};
use crate::service::{validate_input, AnalysisService, ServiceError};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_IO: i32 = 1;
pub const EXIT_INPUT: i32 = 2;
pub const EXIT_CONFIG: i32 = 3;
pub const EXIT_STAGE_FAILURE: i32 = 4;

/// Maps a service failure to the process exit code
pub fn exit_code(error: &ServiceError) -> i32 {
    match error {
        ServiceError::Input(_) => EXIT_INPUT,
        ServiceError::Configuration(_) => EXIT_CONFIG,
        ServiceError::Pipeline(PipelineError::StageFailure { .. }) => EXIT_STAGE_FAILURE,
    }
}

/// Spinner on stderr that follows the stage labels
struct SpinnerHandler {
    bar: ProgressBar,
}

impl SpinnerHandler {
    fn new() -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        let style = ProgressStyle::with_template("{spinner} [{pos}/{len}] {msg} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        bar.set_length(Stage::COUNT as u64);
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }
}

impl ProgressHandler for SpinnerHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::StageStarted { stage } => {
                self.bar.set_position(stage.index() as u64);
                self.bar.set_message(format!("{}...", stage.label()));
            }
            ProgressEvent::StageCompleted { .. } => {}
            ProgressEvent::Completed { .. } => {
                self.bar.finish_and_clear();
            }
            ProgressEvent::ShortCircuited { .. } => {
                self.bar.finish_and_clear();
            }
            ProgressEvent::Failed { stage, kind, .. } => {
                self.bar
                    .abandon_with_message(format!("{} failed ({})", stage.label(), kind));
            }
        }
    }
}

/// Reads the idea from the argument, the `--file` path, or piped stdin.
///
/// An absent idea yields an empty string so input validation reports it.
fn read_idea(args: &AnalyzeArgs) -> io::Result<String> {
    if let Some(idea) = &args.idea {
        return Ok(idea.clone());
    }

    if let Some(path) = &args.file {
        debug!("Reading idea from {}", path.display());
        return fs::read_to_string(path);
    }

    if atty::is(atty::Stream::Stdin) {
        debug!("No idea argument and stdin is a terminal");
        return Ok(String::new());
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn apply_overrides(mut config: IdeaForgeConfig, args: &AnalyzeArgs) -> IdeaForgeConfig {
    if let Some(provider) = args.provider {
        debug!("Provider explicitly set to: {}", provider);
        config = config.with_provider(provider);
    }
    if let Some(model) = &args.model {
        debug!("Model overridden to: {}", model);
        config.model = model.clone();
    }
    if let Some(secs) = args.step_timeout {
        config.step_timeout_secs = secs;
    }
    if let Some(secs) = args.pipeline_timeout {
        config.pipeline_timeout_secs = Some(secs);
    }
    config
}

fn emit(output: &str, path: Option<&Path>, quiet: bool) -> i32 {
    match path {
        Some(path) => match fs::write(path, output) {
            Ok(()) => {
                info!("Output written to: {}", path.display());
                if !quiet {
                    eprintln!("Output written to: {}", path.display());
                }
                EXIT_SUCCESS
            }
            Err(e) => {
                error!("Failed to write output to file: {}", e);
                EXIT_IO
            }
        },
        None => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
            EXIT_SUCCESS
        }
    }
}

fn report_failure(formatter: &OutputFormatter, err: &ServiceError) -> i32 {
    error!(code = err.code(), "{}", err);
    match formatter.format_error(err) {
        Ok(text) if formatter.format() == OutputFormat::Human => eprint!("{}", text),
        Ok(text) => println!("{}", text.trim_end()),
        Err(e) => error!("Failed to format error: {}", e),
    }
    exit_code(err)
}

pub async fn handle_analyze(args: &AnalyzeArgs, quiet: bool) -> i32 {
    let format: OutputFormat = args.format.into();
    let formatter = OutputFormatter::new(format);

    let idea = match read_idea(args) {
        Ok(idea) => idea,
        Err(e) => {
            error!("Failed to read startup idea: {}", e);
            return EXIT_IO;
        }
    };

    if let Err(e) = validate_input(&idea) {
        return report_failure(&formatter, &ServiceError::from(e));
    }

    let config = match IdeaForgeConfig::from_env() {
        Ok(config) => apply_overrides(config, args),
        Err(e) => return report_failure(&formatter, &ServiceError::from(e)),
    };

    let service = match AnalysisService::new(&config) {
        Ok(service) => service,
        Err(e) => return report_failure(&formatter, &e),
    };

    let progress: Arc<dyn ProgressHandler> =
        if format == OutputFormat::Human && !quiet && atty::is(atty::Stream::Stderr) {
            Arc::new(SpinnerHandler::new())
        } else {
            Arc::new(LoggingHandler)
        };

    info!(provider = %config.provider, model = %config.model, "Analyzing startup idea");

    let report = match service.analyze(&idea, Some(progress)).await {
        Ok(report) => report,
        Err(e) => return report_failure(&formatter, &e),
    };

    let output = match formatter.format_report(&report) {
        Ok(out) => out,
        Err(e) => {
            error!("Failed to format output: {}", e);
            return EXIT_IO;
        }
    };

    emit(&output, args.output.as_deref(), quiet)
}

pub fn handle_templates(args: &TemplatesArgs) -> i32 {
    let templates: Vec<&PromptTemplate> = match args.stage {
        Some(stage) => vec![template_for(stage)],
        None => all_templates().iter().collect(),
    };

    print!("{}", format_templates(&templates));
    EXIT_SUCCESS
}

pub fn handle_config(args: &ConfigArgs) -> i32 {
    let formatter = OutputFormatter::new(args.format.into());

    let config = match IdeaForgeConfig::from_env() {
        Ok(config) => config,
        Err(e) => return report_failure(&formatter, &ServiceError::from(e)),
    };

    match formatter.format_config(&config) {
        Ok(output) => emit(&output, None, false),
        Err(e) => {
            error!("Failed to format configuration: {}", e);
            EXIT_IO
        }
    }
}
