use std::env;

#[cfg(test)]
use mockall::automock;
#[cfg(test)]
use mockall::predicate::*;

use crate::errors::{ConfigError, ConfigResult};

impl From<env::VarError> for ConfigError {
    fn from(err: env::VarError) -> Self {
        ConfigError::EnvVarAccess(err.to_string())
    }
}

// Define a trait for environment access so tests can substitute it
#[cfg_attr(test, automock)]
pub trait Environment: Send + Sync {
    fn get_var(&self, key: &str) -> std::result::Result<String, env::VarError>;
}

// Implement the trait for the actual environment
pub struct RealEnvironment;

impl Environment for RealEnvironment {
    fn get_var(&self, key: &str) -> std::result::Result<String, env::VarError> {
        env::var(key)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub enum KeyRetrievalStrategy {
    /// Only use the credential stored by the settings surface
    SettingsOnly,
    /// Only look in environment variables
    EnvironmentOnly,
    /// Try stored settings first, then environment variables (default behavior)
    #[default]
    Both,
}

pub fn get_api_key_default(
    env_var: &str,
    strategy: KeyRetrievalStrategy,
    stored: Option<&str>,
) -> ConfigResult<String> {
    get_api_key(env_var, strategy, stored, &RealEnvironment)
}

pub fn get_api_key(
    env_var: &str,
    strategy: KeyRetrievalStrategy,
    stored: Option<&str>,
    env: &impl Environment,
) -> ConfigResult<String> {
    // An empty settings field means the user never entered a credential.
    let stored = stored.filter(|value| !value.is_empty());

    match strategy {
        KeyRetrievalStrategy::SettingsOnly => stored.map(str::to_string).ok_or_else(|| {
            ConfigError::MissingCredential(format!("no stored credential for {}", env_var))
        }),
        KeyRetrievalStrategy::EnvironmentOnly => {
            env.get_var(env_var).map_err(ConfigError::from)
        }
        KeyRetrievalStrategy::Both => match stored {
            Some(key) => Ok(key.to_string()),
            None => env.get_var(env_var).map_err(|_| {
                ConfigError::MissingCredential(format!(
                    "Could not find {} in settings or environment variables",
                    env_var
                ))
            }),
        },
    }
}
