use crate::documents::DEFAULT_MAX_DOCUMENTS;
use crate::extraction::PdfBackendKind;
use crate::inference::InferenceSettings;
use std::env;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

/// Default OpenAI-compatible base URL for the hosted inference provider.
pub const DEFAULT_INFERENCE_BASE_URL: &str = "https://api.groq.com/openai/v1";
/// Default chat model identifier.
pub const DEFAULT_INFERENCE_MODEL: &str = "llama3-8b-8192";
/// Default request timeout for a single completion call, in seconds.
pub const DEFAULT_INFERENCE_TIMEOUT_SECS: u64 = 45;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the PDF assistant.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer credential for the inference provider. Absence is tolerated; calls fail upstream.
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible API (without `/chat/completions`).
    pub inference_base_url: String,
    /// Chat model identifier sent with every request.
    pub inference_model: String,
    /// Per-request timeout for completion calls.
    pub inference_timeout: Duration,
    /// PDF library used by the text extractor.
    pub pdf_backend: PdfBackendKind,
    /// Uploads kept in memory before the oldest is evicted.
    pub max_documents: usize,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: load_env_optional("GROQ_API_KEY"),
            inference_base_url: load_env_optional("INFERENCE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_INFERENCE_BASE_URL.to_string()),
            inference_model: load_env_optional("INFERENCE_MODEL")
                .unwrap_or_else(|| DEFAULT_INFERENCE_MODEL.to_string()),
            inference_timeout: load_env_optional("INFERENCE_TIMEOUT_SECS")
                .map(|value| {
                    value
                        .parse::<u64>()
                        .ok()
                        .filter(|secs| *secs > 0)
                        .map(Duration::from_secs)
                        .ok_or_else(|| ConfigError::InvalidValue("INFERENCE_TIMEOUT_SECS".into()))
                })
                .transpose()?
                .unwrap_or(Duration::from_secs(DEFAULT_INFERENCE_TIMEOUT_SECS)),
            pdf_backend: load_env_optional("PDF_BACKEND")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|()| ConfigError::InvalidValue("PDF_BACKEND".into()))
                })
                .transpose()?
                .unwrap_or_default(),
            max_documents: load_env_optional("MAX_CACHED_DOCUMENTS")
                .map(|value| parse_max_documents(&value))
                .transpose()?
                .unwrap_or(DEFAULT_MAX_DOCUMENTS),
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
        })
    }

    /// Settings handed to the inference client. The credential is passed by value so the
    /// client never reads process-wide state.
    pub fn inference_settings(&self) -> InferenceSettings {
        InferenceSettings {
            api_key: self.api_key.clone().unwrap_or_default(),
            base_url: self.inference_base_url.clone(),
            model: self.inference_model.clone(),
            timeout: self.inference_timeout,
        }
    }
}

fn parse_max_documents(value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|max| *max > 0)
        .ok_or_else(|| ConfigError::InvalidValue("MAX_CACHED_DOCUMENTS".into()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    if config.api_key.is_none() {
        tracing::warn!("GROQ_API_KEY is not set; inference requests will be rejected upstream");
    }
    tracing::debug!(
        base_url = %config.inference_base_url,
        model = %config.inference_model,
        timeout_secs = config.inference_timeout.as_secs(),
        pdf_backend = ?config.pdf_backend,
        max_documents = config.max_documents,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}
