//! Completion client abstraction layer
//!
//! This module provides a trait-based abstraction for LLM completion calls,
//! allowing different backends (OpenAI-compatible HTTP, GenAI, Mock) to be
//! used interchangeably by the pipeline.

mod client;
mod error;
mod genai;
mod mock;
mod openai_compatible;
mod types;

pub use client::CompletionClient;
pub use error::ProviderError;
pub use genai::GenAIClient;
pub use mock::{MockCompletionClient, MockResponse};
pub use openai_compatible::{OpenAICompatibleClient, GROQ_BASE_URL, OPENAI_BASE_URL};
pub use types::{
    CompletionRequest, ModelConfig, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};
