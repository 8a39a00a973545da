use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The configuration value object produced by the settings surface: provider
/// name, credential fields and selected model, plus the optional embedding
/// provider selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub provider: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<EmbeddingSettings>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    pub provider: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub model: String,
}

impl Settings {
    pub fn load() -> Result<Option<Self>> {
        Self::load_from(Self::settings_path())
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Some(serde_yaml::from_str(&content)?))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(Self::settings_path())
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn settings_path() -> PathBuf {
        let mut path = config_dir();
        path.push("settings.yaml");
        path
    }
}

pub fn config_dir() -> PathBuf {
    let mut path = dirs::config_dir().expect("Could not find config directory");
    path.push("egret");
    std::fs::create_dir_all(&path).expect("Could not create config directory");
    path
}
