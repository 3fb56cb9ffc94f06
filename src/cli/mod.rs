pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{AnalyzeArgs, CliArgs, Commands, ConfigArgs, TemplatesArgs};
pub use output::{OutputFormat, OutputFormatter};
