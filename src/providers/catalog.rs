//! Static model catalogs consumed by the settings surface for display and
//! default selection. No validation happens here.

use strum_macros::EnumIter;

use super::factory::ProviderType;
use crate::errors::{ConfigError, ConfigResult};

/// Metadata the settings surface displays next to an embedding model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmbeddingModelInfo {
    pub id: &'static str,
    pub dimensions: u32,
    /// Dollars per million input tokens, 0.0 for local models.
    pub price_per_million_tokens: f64,
    pub supports_batch: bool,
}

#[derive(EnumIter, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProviderType {
    OpenAi,
    Ollama,
}

impl EmbeddingProviderType {
    pub fn name(&self) -> &'static str {
        match self {
            EmbeddingProviderType::OpenAi => "openai",
            EmbeddingProviderType::Ollama => "ollama",
        }
    }

    pub fn from_name(name: &str) -> ConfigResult<Self> {
        match name.to_lowercase().as_str() {
            "openai" => Ok(EmbeddingProviderType::OpenAi),
            "ollama" => Ok(EmbeddingProviderType::Ollama),
            _ => Err(ConfigError::UnknownProvider(name.to_string())),
        }
    }
}

const OPEN_AI_EMBEDDING_MODELS: &[EmbeddingModelInfo] = &[
    EmbeddingModelInfo {
        id: "text-embedding-3-small",
        dimensions: 1536,
        price_per_million_tokens: 0.02,
        supports_batch: true,
    },
    EmbeddingModelInfo {
        id: "text-embedding-3-large",
        dimensions: 3072,
        price_per_million_tokens: 0.13,
        supports_batch: true,
    },
    EmbeddingModelInfo {
        id: "text-embedding-ada-002",
        dimensions: 1536,
        price_per_million_tokens: 0.10,
        supports_batch: true,
    },
];

const OLLAMA_EMBEDDING_MODELS: &[EmbeddingModelInfo] = &[
    EmbeddingModelInfo {
        id: "nomic-embed-text",
        dimensions: 768,
        price_per_million_tokens: 0.0,
        supports_batch: false,
    },
    EmbeddingModelInfo {
        id: "mxbai-embed-large",
        dimensions: 1024,
        price_per_million_tokens: 0.0,
        supports_batch: false,
    },
];

pub fn embedding_models(provider: EmbeddingProviderType) -> &'static [EmbeddingModelInfo] {
    match provider {
        EmbeddingProviderType::OpenAi => OPEN_AI_EMBEDDING_MODELS,
        EmbeddingProviderType::Ollama => OLLAMA_EMBEDDING_MODELS,
    }
}

/// The model preselected when the user has not picked one.
pub fn default_embedding_model(provider: EmbeddingProviderType) -> &'static EmbeddingModelInfo {
    &embedding_models(provider)[0]
}

pub fn default_chat_model(provider: ProviderType) -> &'static str {
    match provider {
        ProviderType::OpenAi => "gpt-4o",
        ProviderType::OpenAiCompatible => "gpt-4o",
        ProviderType::Ollama => "llama3.1",
    }
}
