use serde::{Deserialize, Serialize};
use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug, Clone, Deserialize, Serialize)]
pub enum ConfigError {
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Missing host: {0}")]
    MissingHost(String),

    #[error("Failed to access environment variable: {0}")]
    EnvVarAccess(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
