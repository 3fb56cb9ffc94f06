//! Prompt templates and placeholder rendering

pub mod render;
pub mod templates;

pub use render::{render_prompt, PromptVariables, JSON_ONLY_INSTRUCTION};
pub use templates::{all_templates, template_for, PromptTemplate};
