//! Placeholder substitution for prompt templates

use regex::{Captures, Regex};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Instruction appended to every rendered prompt
pub const JSON_ONLY_INSTRUCTION: &str =
    "Respond ONLY with valid JSON. Do not include markdown or any other formatting.";

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
    })
}

/// Named values substituted into `{name}` placeholders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptVariables {
    values: BTreeMap<String, Value>,
}

impl PromptVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable. Strings are inserted verbatim, everything else as JSON text.
    pub fn with(mut self, name: impl Into<String>, value: impl Serialize) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Serialize) {
        self.values.insert(name.into(), serde_json::json!(value));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Substitutes every known placeholder. Unknown placeholders are left as-is.
pub fn substitute(template: &str, variables: &PromptVariables) -> String {
    placeholder_pattern()
        .replace_all(template, |caps: &Captures| match variables.get(&caps[1]) {
            Some(value) => value_text(value),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Renders a template and appends the JSON-only instruction.
pub fn render_prompt(template: &str, variables: &PromptVariables) -> String {
    let prompt = format!("{}\n\n{}", template.trim_end(), JSON_ONLY_INSTRUCTION);
    substitute(&prompt, variables)
}

/// Placeholder names referenced by a template, in first-occurrence order
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in placeholder_pattern().captures_iter(template) {
        let name = caps[1].to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}
