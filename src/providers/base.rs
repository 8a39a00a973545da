use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::configs::ProviderConfig;

/// Outcome of a credential check as consumed by the settings surface, which
/// renders a loading indicator until the verdict arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStatus {
    /// A check is in flight.
    Pending,
    Valid,
    Invalid,
}

impl KeyStatus {
    pub fn from_valid(valid: bool) -> Self {
        if valid {
            KeyStatus::Valid
        } else {
            KeyStatus::Invalid
        }
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, KeyStatus::Pending)
    }
}

/// Base trait for credential validators (OpenAI, Ollama, etc)
///
/// The transport layer implements this against the real endpoints; the
/// settings surface only ever sees the resulting `KeyStatus`.
#[async_trait]
pub trait KeyValidator: Send + Sync {
    /// Check whether the configured credentials are accepted by the provider
    async fn validate(&self, config: &ProviderConfig) -> Result<bool>;
}
