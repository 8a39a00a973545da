use serde::{Deserialize, Serialize};

// Unified enum to wrap different provider configurations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProviderConfig {
    OpenAi(OpenAiProviderConfig),
    OpenAiCompatible(OpenAiCompatibleProviderConfig),
    Ollama(OllamaProviderConfig),
}

impl ProviderConfig {
    /// The model id requests are routed to
    pub fn model(&self) -> &str {
        match self {
            ProviderConfig::OpenAi(config) => &config.model,
            ProviderConfig::OpenAiCompatible(config) => &config.model,
            ProviderConfig::Ollama(config) => &config.model,
        }
    }

    pub fn host(&self) -> &str {
        match self {
            ProviderConfig::OpenAi(config) => &config.host,
            ProviderConfig::OpenAiCompatible(config) => &config.host,
            ProviderConfig::Ollama(config) => &config.host,
        }
    }
}

// Define specific config structs for each provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAiProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
}

/// Any endpoint speaking the chat completion protocol under a custom host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAiCompatibleProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OllamaProviderConfig {
    pub host: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
}
