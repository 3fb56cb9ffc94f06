//! Completion request types
//!
//! These types describe a single prompt/response exchange independent of any
//! specific provider implementation.

use serde::{Deserialize, Serialize};

/// Default model served by Groq
pub const DEFAULT_MODEL: &str = "deepseek-r1-distill-llama-70b";

/// Moderate temperature, leaves the model some room for creative suggestions
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Fixed model parameters applied to every pipeline request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Provider-specific model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Ceiling on generated tokens
    pub max_tokens: u32,
    /// Ask the provider for a JSON-structured response when it supports one
    pub json_mode: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            json_mode: true,
        }
    }
}

impl ModelConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_json_mode(mut self, json_mode: bool) -> Self {
        self.json_mode = json_mode;
        self
    }
}

/// A single user prompt to send to the completion service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Fully rendered prompt text
    pub prompt: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub json_mode: bool,
}

impl CompletionRequest {
    /// Creates a request carrying the given model parameters
    pub fn new(prompt: impl Into<String>, config: &ModelConfig) -> Self {
        Self {
            prompt: prompt.into(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            json_mode: config.json_mode,
        }
    }
}
