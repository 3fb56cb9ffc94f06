use crate::config::Provider;
use crate::pipeline::Stage;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// LLM-driven startup idea analysis
#[derive(Parser, Debug)]
#[command(
    name = "ideaforge",
    about = "LLM-driven startup idea analysis",
    version,
    author,
    long_about = "ideaforge runs a startup pitch through five LLM stages (validation, scoring, \
                  improvements, funding and launch planning) and prints a structured report. \
                  It supports Groq, OpenAI, Anthropic, Gemini and Ollama and renders JSON, YAML \
                  or human-readable output."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress progress and non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Analyze a startup idea",
        long_about = "Validates the idea, scores it, then generates improvements, a funding \
                      strategy and a launch plan.\n\n\
                      The idea is read from the argument, from --file, or from stdin.\n\n\
                      Examples:\n  \
                      ideaforge analyze \"Subscription boxes of local coffee for remote teams\"\n  \
                      ideaforge analyze --file pitch.txt --format json\n  \
                      echo \"...\" | ideaforge analyze --provider openai --model gpt-4o-mini"
    )]
    Analyze(AnalyzeArgs),

    #[command(
        about = "Print the prompt templates",
        long_about = "Prints the prompt template used by each stage.\n\n\
                      Examples:\n  \
                      ideaforge templates\n  \
                      ideaforge templates --stage scoring"
    )]
    Templates(TemplatesArgs),

    #[command(about = "Show the effective configuration")]
    Config(ConfigArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    #[arg(value_name = "IDEA", help = "Startup idea (reads stdin when omitted)")]
    pub idea: Option<String>,

    #[arg(
        long,
        value_name = "PATH",
        conflicts_with = "idea",
        help = "Read the idea from a file"
    )]
    pub file: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'p',
        long,
        value_parser = parse_provider,
        help = "Provider to use (groq, openai, anthropic, gemini, ollama)"
    )]
    pub provider: Option<Provider>,

    #[arg(
        short = 'm',
        long,
        value_name = "MODEL",
        help = "Model name to use (provider-specific)"
    )]
    pub model: Option<String>,

    #[arg(long, value_name = "SECONDS", help = "Timeout for each stage")]
    pub step_timeout: Option<u64>,

    #[arg(long, value_name = "SECONDS", help = "Timeout for the whole analysis")]
    pub pipeline_timeout: Option<u64>,
}

#[derive(Parser, Debug, Clone)]
pub struct TemplatesArgs {
    #[arg(
        short = 's',
        long,
        value_parser = parse_stage,
        help = "Only print the template for this stage"
    )]
    pub stage: Option<Stage>,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

fn parse_provider(s: &str) -> Result<Provider, String> {
    s.parse::<Provider>().map_err(|e| e.to_string())
}

fn parse_stage(s: &str) -> Result<Stage, String> {
    Stage::from_name(s).ok_or_else(|| {
        format!(
            "Invalid stage: {}. Valid options: validation, scoring, improvement, funding, launch",
            s
        )
    })
}
