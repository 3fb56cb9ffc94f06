//! Output formatting for multiple formats
//!
//! Reports, errors, configuration and templates render as JSON, YAML, or
//! human-readable text.
//!
//! # Example
//!
//! ```ignore
//! use ideaforge::cli::output::{OutputFormat, OutputFormatter};
//!
//! let formatter = OutputFormatter::new(OutputFormat::Json);
//! let output = formatter.format_report(&report)?;
//! println!("{}", output);
//! ```

use anyhow::{Context, Result};
use serde_json::json;

use crate::analysis::{AnalysisReport, ScoreCard, StartupAnalysis, ValidAnalysis};
use crate::config::IdeaForgeConfig;
use crate::prompt::PromptTemplate;
use crate::service::ServiceError;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// Output formatter for analysis reports
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report)
                .context("Failed to serialize analysis report to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(report).context("Failed to serialize analysis report to YAML")
            }
            OutputFormat::Human => Ok(self.format_report_human(report)),
        }
    }

    /// Formats a failure; JSON and YAML carry `error`, `code` and `stage`
    pub fn format_error(&self, error: &ServiceError) -> Result<String> {
        let value = json!({
            "error": error.to_string(),
            "code": error.code(),
            "stage": error.stage().map(|s| s.name()),
        });

        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&value).context("Failed to serialize error to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(&value).context("Failed to serialize error to YAML")
            }
            OutputFormat::Human => Ok(format!("{}\n", error.help_message())),
        }
    }

    pub fn format_config(&self, config: &IdeaForgeConfig) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&config.to_display_map())
                .context("Failed to serialize config to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(&config.to_display_map())
                .context("Failed to serialize config to YAML"),
            OutputFormat::Human => Ok(config.to_string()),
        }
    }

    // Human-readable formatting methods

    fn format_report_human(&self, report: &AnalysisReport) -> String {
        let mut output = String::new();

        match &report.analysis {
            StartupAnalysis::Invalid(invalid) => {
                output.push_str("\u{26A0} Not a Startup Idea\n");
                output.push_str(RULE);
                output.push_str("\n\n");
                output.push_str(&format!("Input: {}\n\n", invalid.sanitized_input));
                output.push_str(&format!("{}\n", invalid.satirical_feedback));
            }
            StartupAnalysis::Valid(valid) => {
                output.push_str("\u{2713} Startup Analysis\n");
                output.push_str(RULE);
                output.push_str("\n\n");
                output.push_str(&format!("Idea: {}\n\n", valid.sanitized_input));
                push_valid_sections(&mut output, valid);
            }
        }

        output.push_str(&format!(
            "\nProcessed in {}ms (run {})\n",
            report.metadata.processing_time_ms, report.metadata.run_id
        ));
        output
    }
}

fn score_bar(score: f64) -> String {
    let filled = score.round().clamp(0.0, 10.0) as usize;
    "\u{2588}".repeat(filled) + &"\u{2591}".repeat(10 - filled)
}

fn push_scores(output: &mut String, scores: &ScoreCard) {
    output.push_str("Scores:\n");
    let rows = [
        ("Market Size", scores.market_size),
        ("Competition", scores.competition),
        ("Feasibility", scores.feasibility),
        ("Monetization", scores.monetization),
        ("Scalability", scores.scalability),
    ];
    for (name, value) in rows {
        output.push_str(&format!(
            "\u{251C}\u{2500} {:<13} {} {:>4.1}\n",
            name,
            score_bar(value),
            value
        ));
    }
    output.push_str(&format!(
        "\u{2514}\u{2500} {:<13} {} {:>4.1}\n\n",
        "Overall",
        score_bar(scores.overall),
        scores.overall
    ));
}

fn push_list(output: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    output.push_str(&format!("{}:\n", title));
    for item in items {
        output.push_str(&format!("  - {}\n", item));
    }
    output.push('\n');
}

fn push_heading(output: &mut String, title: &str) {
    output.push_str(title);
    output.push('\n');
    output.push_str(RULE);
    output.push_str("\n\n");
}

fn push_valid_sections(output: &mut String, valid: &ValidAnalysis) {
    push_scores(output, &valid.scores);
    push_list(output, "Pros", &valid.pros);
    push_list(output, "Cons", &valid.cons);
    if !valid.benchmark_comparison.is_empty() {
        output.push_str(&format!("Benchmark: {}\n\n", valid.benchmark_comparison));
    }

    let improvements = &valid.improvements;
    if !improvements.is_empty() {
        push_heading(output, "Improvements");
        push_list(output, "Product-Market Fit", &improvements.product_market_fit);
        push_list(output, "Branding", &improvements.branding);
        push_list(output, "Pricing", &improvements.pricing);
        push_list(output, "MVP Features", &improvements.mvp_features);
    }

    let funding = &valid.funding_strategy;
    if !funding.is_empty() {
        push_heading(output, "Funding Strategy");
        push_list(output, "Investor Types", &funding.investor_types);
        push_list(output, "Pitch Outline", &funding.pitch_outline);
        push_list(output, "Specific Investors", &funding.specific_investors);
        push_list(output, "Networking Tips", &funding.networking_tips);
        push_list(output, "Timeline", &funding.timeline.display_lines());
    }

    let launch = &valid.launch_plan;
    if !launch.is_empty() {
        push_heading(output, "Launch Plan");
        push_list(output, "Early Adopters", &launch.early_adopters);
        push_list(output, "Launch Platforms", &launch.launch_platforms);
        push_list(output, "Community Building", &launch.community_building);
        push_list(output, "Key Metrics", &launch.key_metrics);
        let plan: Vec<String> = launch
            .ninety_day_plan
            .iter()
            .map(|action| action.display_text())
            .collect();
        push_list(output, "90-Day Plan", &plan);
    }
}

/// Renders prompt templates for the `templates` command
pub fn format_templates(templates: &[&PromptTemplate]) -> String {
    let mut output = String::new();
    for template in templates {
        output.push_str(&format!(
            "Step {} {} ({})\n",
            template.stage.index(),
            template.stage.name(),
            template.stage.label()
        ));
        output.push_str(RULE);
        output.push('\n');
        output.push_str(&format!("Placeholders: {}\n", template.placeholders.join(", ")));
        output.push_str(template.text.trim());
        output.push_str("\n\n");
    }
    output
}
