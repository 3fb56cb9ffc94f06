//! Configuration management for ideaforge
//!
//! Settings are loaded from environment variables with sensible defaults.
//! Configuration covers provider selection, credentials, model parameters,
//! stage deadlines and logging.
//!
//! # Environment Variables
//!
//! ## Ideaforge Configuration
//! - `IDEAFORGE_PROVIDER`: Provider selection (groq|openai|anthropic|gemini|ollama) - default: "groq"
//! - `IDEAFORGE_MODEL`: Model name - default: provider specific
//! - `IDEAFORGE_API_BASE_URL`: Override the provider's API root
//! - `IDEAFORGE_TEMPERATURE`: Sampling temperature - default: "0.7"
//! - `IDEAFORGE_MAX_TOKENS`: Completion token ceiling - default: "2048"
//! - `IDEAFORGE_STEP_TIMEOUT`: Seconds allowed per stage - default: "30"
//! - `IDEAFORGE_PIPELINE_TIMEOUT`: Seconds allowed for the whole run - default: unset
//! - `IDEAFORGE_LOG_LEVEL`: Logging level - default: "info"
//! - `IDEAFORGE_LOG_JSON`: Emit JSON logs (true|false) - default: "false"
//!
//! ## Provider Credentials
//! - **Groq**: `GROQ_API_KEY`
//! - **OpenAI**: `OPENAI_API_KEY`
//! - **Anthropic**: `ANTHROPIC_API_KEY`
//! - **Gemini**: `GEMINI_API_KEY`
//! - **Ollama**: none (`OLLAMA_HOST` is honored via `IDEAFORGE_API_BASE_URL`)
//!
//! # Example
//!
//! ```no_run
//! use ideaforge::IdeaForgeConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = IdeaForgeConfig::from_env()?;
//! config.validate()?;
//! config.require_credentials()?;
//!
//! let client = config.create_client()?;
//! # let _ = client;
//! # Ok(())
//! # }
//! ```

use crate::llm::{
    CompletionClient, GenAIClient, ModelConfig, OpenAICompatibleClient, ProviderError,
    DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, GROQ_BASE_URL, OPENAI_BASE_URL,
};
use crate::pipeline::PipelineConfig;
use genai::adapter::AdapterKind;
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_STEP_TIMEOUT_SECS: u64 = 30;
const MAX_STEP_TIMEOUT_SECS: u64 = 600;
const MAX_TOKENS_CEILING: u32 = 32_768;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The selected provider needs a credential that is not set
    #[error("Missing credential: set the {variable} environment variable")]
    MissingCredential { variable: String },

    /// Invalid provider name
    #[error("Invalid provider: {0}. Valid options: groq, openai, anthropic, gemini, ollama")]
    InvalidProvider(String),

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Failed to parse configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },

    /// Client initialization failed
    #[error("Client initialization failed: {0}")]
    ClientInit(#[from] ProviderError),
}

/// Completion provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Groq,
    OpenAI,
    Anthropic,
    Gemini,
    Ollama,
}

impl Provider {
    pub fn name(self) -> &'static str {
        match self {
            Provider::Groq => "groq",
            Provider::OpenAI => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Gemini => "gemini",
            Provider::Ollama => "ollama",
        }
    }

    /// Environment variable holding the API key, if the provider needs one
    pub fn credential_var(self) -> Option<&'static str> {
        match self {
            Provider::Groq => Some("GROQ_API_KEY"),
            Provider::OpenAI => Some("OPENAI_API_KEY"),
            Provider::Anthropic => Some("ANTHROPIC_API_KEY"),
            Provider::Gemini => Some("GEMINI_API_KEY"),
            Provider::Ollama => None,
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Provider::Groq => DEFAULT_MODEL,
            Provider::OpenAI => "gpt-4o-mini",
            Provider::Anthropic => "claude-3-5-haiku-latest",
            Provider::Gemini => "gemini-2.0-flash",
            Provider::Ollama => "llama3.1:8b",
        }
    }

    /// Whether the provider speaks the OpenAI chat-completions wire format
    pub fn is_openai_compatible(self) -> bool {
        matches!(self, Provider::Groq | Provider::OpenAI)
    }

    fn adapter_kind(self) -> AdapterKind {
        match self {
            Provider::Groq => AdapterKind::Groq,
            Provider::OpenAI => AdapterKind::OpenAI,
            Provider::Anthropic => AdapterKind::Anthropic,
            Provider::Gemini => AdapterKind::Gemini,
            Provider::Ollama => AdapterKind::Ollama,
        }
    }

    fn default_base_url(self) -> Option<&'static str> {
        match self {
            Provider::Groq => Some(GROQ_BASE_URL),
            Provider::OpenAI => Some(OPENAI_BASE_URL),
            _ => None,
        }
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "groq" => Ok(Provider::Groq),
            "openai" => Ok(Provider::OpenAI),
            "anthropic" | "claude" => Ok(Provider::Anthropic),
            "gemini" | "google" => Ok(Provider::Gemini),
            "ollama" => Ok(Provider::Ollama),
            other => Err(ConfigError::InvalidProvider(other.to_string())),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Main configuration structure for ideaforge
#[derive(Clone)]
pub struct IdeaForgeConfig {
    pub provider: Provider,

    /// Model name to use for inference (provider-specific)
    pub model: String,

    /// API root override
    pub api_base_url: Option<String>,

    /// Credential read from the provider's key variable
    pub api_key: Option<String>,

    pub temperature: f32,

    pub max_tokens: u32,

    /// Per-stage deadline in seconds
    pub step_timeout_secs: u64,

    /// Optional whole-run deadline in seconds
    pub pipeline_timeout_secs: Option<u64>,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    pub log_json: bool,
}

impl Default for IdeaForgeConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Groq,
            model: Provider::Groq.default_model().to_string(),
            api_base_url: None,
            api_key: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            step_timeout_secs: DEFAULT_STEP_TIMEOUT_SECS,
            pipeline_timeout_secs: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_json: false,
        }
    }
}

fn env_value(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError>
where
    T::Err: fmt::Display,
{
    match env_value(key) {
        None => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(|e| ConfigError::ParseError {
            field: key.to_string(),
            error: e.to_string(),
        }),
    }
}

impl IdeaForgeConfig {
    /// Loads the configuration from `IDEAFORGE_*` variables and the provider's
    /// credential variable. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let provider = match env_value("IDEAFORGE_PROVIDER") {
            Some(name) => name.parse::<Provider>()?,
            None => defaults.provider,
        };

        let model = env_value("IDEAFORGE_MODEL")
            .unwrap_or_else(|| provider.default_model().to_string());

        let api_base_url = env_value("IDEAFORGE_API_BASE_URL").or_else(|| {
            if provider == Provider::Ollama {
                env_value("OLLAMA_HOST")
            } else {
                None
            }
        });

        let api_key = provider.credential_var().and_then(env_value);

        Ok(Self {
            provider,
            model,
            api_base_url,
            api_key,
            temperature: parse_env("IDEAFORGE_TEMPERATURE")?.unwrap_or(defaults.temperature),
            max_tokens: parse_env("IDEAFORGE_MAX_TOKENS")?.unwrap_or(defaults.max_tokens),
            step_timeout_secs: parse_env("IDEAFORGE_STEP_TIMEOUT")?
                .unwrap_or(defaults.step_timeout_secs),
            pipeline_timeout_secs: parse_env("IDEAFORGE_PIPELINE_TIMEOUT")?,
            log_level: env_value("IDEAFORGE_LOG_LEVEL")
                .unwrap_or(defaults.log_level)
                .to_lowercase(),
            log_json: parse_env("IDEAFORGE_LOG_JSON")?.unwrap_or(defaults.log_json),
        })
    }

    /// Switches provider, re-reading its credential and resetting the model
    /// to the provider default.
    pub fn with_provider(mut self, provider: Provider) -> Self {
        if provider != self.provider {
            self.provider = provider;
            self.model = provider.default_model().to_string();
            self.api_key = provider.credential_var().and_then(env_value);
            self.api_base_url = None;
        }
        self
    }

    /// Validates value ranges
    ///
    /// Credentials are checked separately by [`require_credentials`](Self::require_credentials).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Model name must not be empty".to_string(),
            ));
        }

        if !self.temperature.is_finite() || !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationFailed(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }

        if self.max_tokens == 0 || self.max_tokens > MAX_TOKENS_CEILING {
            return Err(ConfigError::ValidationFailed(format!(
                "Max tokens must be between 1 and {}",
                MAX_TOKENS_CEILING
            )));
        }

        if self.step_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Step timeout must be at least 1 second".to_string(),
            ));
        }
        if self.step_timeout_secs > MAX_STEP_TIMEOUT_SECS {
            return Err(ConfigError::ValidationFailed(
                "Step timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if self.pipeline_timeout_secs == Some(0) {
            return Err(ConfigError::ValidationFailed(
                "Pipeline timeout must be at least 1 second".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    /// Fails when the provider needs a credential that was not supplied
    pub fn require_credentials(&self) -> Result<(), ConfigError> {
        match self.provider.credential_var() {
            Some(variable) if self.api_key.is_none() => Err(ConfigError::MissingCredential {
                variable: variable.to_string(),
            }),
            _ => Ok(()),
        }
    }

    pub fn model_config(&self) -> ModelConfig {
        ModelConfig::new(self.model.clone())
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
            .with_json_mode(true)
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        let config =
            PipelineConfig::new().with_step_timeout(Duration::from_secs(self.step_timeout_secs));
        match self.pipeline_timeout_secs {
            Some(secs) => config.with_pipeline_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }

    /// Builds the completion client for the configured provider
    pub fn create_client(&self) -> Result<Arc<dyn CompletionClient>, ConfigError> {
        self.require_credentials()?;
        let timeout = Duration::from_secs(self.step_timeout_secs);

        if self.provider.is_openai_compatible() {
            let base_url = self
                .api_base_url
                .clone()
                .or_else(|| self.provider.default_base_url().map(str::to_string))
                .unwrap_or_else(|| GROQ_BASE_URL.to_string());
            let api_key = self.api_key.clone().unwrap_or_default();
            let client = OpenAICompatibleClient::new(base_url, api_key, timeout)?;
            return Ok(Arc::new(client));
        }

        Ok(Arc::new(GenAIClient::new(
            self.provider.adapter_kind(),
            &self.model,
            self.api_base_url.clone(),
            timeout,
        )))
    }

    /// Converts configuration to a display map for output formatting; secrets
    /// are reported only as present or absent.
    pub fn to_display_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();

        map.insert("provider".to_string(), self.provider.to_string());
        map.insert("model".to_string(), self.model.clone());
        if let Some(ref url) = self.api_base_url {
            map.insert("api_base_url".to_string(), url.clone());
        }
        if let Some(variable) = self.provider.credential_var() {
            let state = if self.api_key.is_some() { "set" } else { "missing" };
            map.insert("credential".to_string(), format!("{} ({})", variable, state));
        }
        map.insert("temperature".to_string(), self.temperature.to_string());
        map.insert("max_tokens".to_string(), self.max_tokens.to_string());
        map.insert(
            "step_timeout_secs".to_string(),
            self.step_timeout_secs.to_string(),
        );
        if let Some(secs) = self.pipeline_timeout_secs {
            map.insert("pipeline_timeout_secs".to_string(), secs.to_string());
        }
        map.insert("log_level".to_string(), self.log_level.clone());
        map.insert("log_json".to_string(), self.log_json.to_string());

        map
    }
}

impl fmt::Debug for IdeaForgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdeaForgeConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("step_timeout_secs", &self.step_timeout_secs)
            .field("pipeline_timeout_secs", &self.pipeline_timeout_secs)
            .field("log_level", &self.log_level)
            .field("log_json", &self.log_json)
            .finish()
    }
}

impl fmt::Display for IdeaForgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ideaforge Configuration:")?;
        writeln!(f, "  Provider: {}", self.provider)?;
        writeln!(f, "  Model: {}", self.model)?;
        if let Some(ref url) = self.api_base_url {
            writeln!(f, "  API Base URL: {}", url)?;
        }
        if let Some(variable) = self.provider.credential_var() {
            let state = if self.api_key.is_some() { "set" } else { "missing" };
            writeln!(f, "  Credential: {} ({})", variable, state)?;
        }
        writeln!(f, "  Temperature: {}", self.temperature)?;
        writeln!(f, "  Max Tokens: {}", self.max_tokens)?;
        writeln!(f, "  Step Timeout: {}s", self.step_timeout_secs)?;
        match self.pipeline_timeout_secs {
            Some(secs) => writeln!(f, "  Pipeline Timeout: {}s", secs)?,
            None => writeln!(f, "  Pipeline Timeout: none")?,
        }
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper to temporarily set environment variables for testing
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    const ALL_VARS: [&str; 10] = [
        "IDEAFORGE_PROVIDER",
        "IDEAFORGE_MODEL",
        "IDEAFORGE_API_BASE_URL",
        "IDEAFORGE_TEMPERATURE",
        "IDEAFORGE_MAX_TOKENS",
        "IDEAFORGE_STEP_TIMEOUT",
        "IDEAFORGE_PIPELINE_TIMEOUT",
        "IDEAFORGE_LOG_LEVEL",
        "IDEAFORGE_LOG_JSON",
        "GROQ_API_KEY",
    ];

    fn clean_env() -> Vec<EnvGuard> {
        ALL_VARS.iter().map(|key| EnvGuard::unset(key)).collect()
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = clean_env();

        let config = IdeaForgeConfig::from_env().unwrap();

        assert_eq!(config.provider, Provider::Groq);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.step_timeout_secs, DEFAULT_STEP_TIMEOUT_SECS);
        assert_eq!(config.pipeline_timeout_secs, None);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert!(config.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let mut guards = clean_env();
        guards.extend([
            EnvGuard::set("IDEAFORGE_PROVIDER", "openai"),
            EnvGuard::set("IDEAFORGE_MODEL", "custom-model"),
            EnvGuard::set("IDEAFORGE_TEMPERATURE", "0.2"),
            EnvGuard::set("IDEAFORGE_MAX_TOKENS", "1024"),
            EnvGuard::set("IDEAFORGE_STEP_TIMEOUT", "45"),
            EnvGuard::set("IDEAFORGE_PIPELINE_TIMEOUT", "120"),
            EnvGuard::set("IDEAFORGE_LOG_LEVEL", "DEBUG"),
            EnvGuard::set("OPENAI_API_KEY", "sk-test"),
        ]);

        let config = IdeaForgeConfig::from_env().unwrap();

        assert_eq!(config.provider, Provider::OpenAI);
        assert_eq!(config.model, "custom-model");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.step_timeout_secs, 45);
        assert_eq!(config.pipeline_timeout_secs, Some(120));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));

        let pipeline = config.pipeline_config();
        assert_eq!(pipeline.step_timeout, Duration::from_secs(45));
        assert_eq!(pipeline.pipeline_timeout, Some(Duration::from_secs(120)));
    }

    #[test]
    #[serial]
    fn test_invalid_provider_is_rejected() {
        let mut guards = clean_env();
        guards.push(EnvGuard::set("IDEAFORGE_PROVIDER", "carrier-pigeon"));

        let err = IdeaForgeConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidProvider(ref p) if p == "carrier-pigeon"));
    }

    #[test]
    #[serial]
    fn test_unparseable_number_is_rejected() {
        let mut guards = clean_env();
        guards.push(EnvGuard::set("IDEAFORGE_STEP_TIMEOUT", "soon"));

        let err = IdeaForgeConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { ref field, .. } if field == "IDEAFORGE_STEP_TIMEOUT"));
    }

    #[test]
    fn test_missing_credential() {
        let config = IdeaForgeConfig::default();
        match config.require_credentials() {
            Err(ConfigError::MissingCredential { variable }) => assert_eq!(variable, "GROQ_API_KEY"),
            other => panic!("expected missing credential, got {:?}", other),
        }
        assert!(config.create_client().is_err());

        let ollama = IdeaForgeConfig {
            provider: Provider::Ollama,
            ..Default::default()
        };
        assert!(ollama.require_credentials().is_ok());
    }

    #[test]
    fn test_create_openai_compatible_client() {
        let config = IdeaForgeConfig {
            api_key: Some("gsk-test".to_string()),
            ..Default::default()
        };
        let client = config.create_client().unwrap();
        assert_eq!(client.name(), "Groq");
    }

    #[test]
    fn test_configuration_validation() {
        assert!(IdeaForgeConfig::default().validate().is_ok());

        let mut config = IdeaForgeConfig::default();
        config.step_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = IdeaForgeConfig::default();
        config.temperature = 3.5;
        assert!(config.validate().is_err());

        let mut config = IdeaForgeConfig::default();
        config.max_tokens = 0;
        assert!(config.validate().is_err());

        let mut config = IdeaForgeConfig::default();
        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());

        let mut config = IdeaForgeConfig::default();
        config.pipeline_timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("Groq".parse::<Provider>().unwrap(), Provider::Groq);
        assert_eq!("claude".parse::<Provider>().unwrap(), Provider::Anthropic);
        assert!("".parse::<Provider>().is_err());
        assert_eq!(Provider::Ollama.credential_var(), None);
    }

    #[test]
    fn test_model_config_uses_fixed_parameters() {
        let model = IdeaForgeConfig::default().model_config();
        assert_eq!(model.model, DEFAULT_MODEL);
        assert_eq!(model.temperature, 0.7);
        assert_eq!(model.max_tokens, 2048);
        assert!(model.json_mode);
    }

    #[test]
    fn test_display_hides_secrets() {
        let config = IdeaForgeConfig {
            api_key: Some("gsk-super-secret".to_string()),
            ..Default::default()
        };

        let display = format!("{}", config);
        assert!(display.contains("Ideaforge Configuration:"));
        assert!(display.contains("GROQ_API_KEY (set)"));
        assert!(!display.contains("gsk-super-secret"));
        assert!(!format!("{:?}", config).contains("gsk-super-secret"));
        assert!(!config
            .to_display_map()
            .values()
            .any(|v| v.contains("gsk-super-secret")));
    }
}
