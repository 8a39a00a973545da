use strum_macros::EnumIter;

use super::catalog;
use super::configs::{
    OllamaProviderConfig, OpenAiCompatibleProviderConfig, OpenAiProviderConfig, ProviderConfig,
};
use crate::config::Settings;
use crate::errors::{ConfigError, ConfigResult};
use crate::keys::{get_api_key_default, KeyRetrievalStrategy};

pub const PROVIDER_OPEN_AI: &str = "openai";
pub const PROVIDER_OPEN_AI_COMPATIBLE: &str = "openai-compatible";
pub const PROVIDER_OLLAMA: &str = "ollama";

pub const OPEN_AI_HOST: &str = "https://api.openai.com";
pub const OLLAMA_HOST: &str = "http://localhost:11434";

#[derive(EnumIter, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    OpenAi,
    OpenAiCompatible,
    Ollama,
}

impl ProviderType {
    /// Stable name used in persisted settings and the provider dropdown
    pub fn name(&self) -> &'static str {
        match self {
            ProviderType::OpenAi => PROVIDER_OPEN_AI,
            ProviderType::OpenAiCompatible => PROVIDER_OPEN_AI_COMPATIBLE,
            ProviderType::Ollama => PROVIDER_OLLAMA,
        }
    }

    pub fn from_name(name: &str) -> ConfigResult<Self> {
        match name.to_lowercase().as_str() {
            PROVIDER_OPEN_AI => Ok(ProviderType::OpenAi),
            PROVIDER_OPEN_AI_COMPATIBLE => Ok(ProviderType::OpenAiCompatible),
            PROVIDER_OLLAMA => Ok(ProviderType::Ollama),
            _ => Err(ConfigError::UnknownProvider(name.to_string())),
        }
    }
}

/// Resolve the settings-surface value object into a typed provider config.
///
/// Credentials come from the stored settings first, then the environment.
/// An empty model falls back to the provider's catalog default.
pub fn config_from_settings(settings: &Settings) -> ConfigResult<ProviderConfig> {
    let provider = ProviderType::from_name(&settings.provider)?;

    let model = if settings.model.is_empty() {
        catalog::default_chat_model(provider).to_string()
    } else {
        settings.model.clone()
    };

    match provider {
        ProviderType::OpenAi => {
            let api_key = get_api_key_default(
                "OPENAI_API_KEY",
                KeyRetrievalStrategy::Both,
                Some(&settings.api_key),
            )?;
            Ok(ProviderConfig::OpenAi(OpenAiProviderConfig {
                host: OPEN_AI_HOST.to_string(),
                api_key,
                model,
                temperature: None,
                max_tokens: None,
            }))
        }
        ProviderType::OpenAiCompatible => {
            if settings.host.is_empty() {
                return Err(ConfigError::MissingHost(settings.provider.clone()));
            }
            let api_key = get_api_key_default(
                "EGRET_API_KEY",
                KeyRetrievalStrategy::Both,
                Some(&settings.api_key),
            )?;
            Ok(ProviderConfig::OpenAiCompatible(
                OpenAiCompatibleProviderConfig {
                    host: settings.host.clone(),
                    api_key,
                    model,
                    temperature: None,
                    max_tokens: None,
                },
            ))
        }
        ProviderType::Ollama => Ok(ProviderConfig::Ollama(OllamaProviderConfig {
            host: if settings.host.is_empty() {
                OLLAMA_HOST.to_string()
            } else {
                settings.host.clone()
            },
            model,
            temperature: None,
            max_tokens: None,
        })),
    }
}
