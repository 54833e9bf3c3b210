//! File-based configuration backed by `config.yml`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{Config, config_dir, env_key, validate};
use crate::errors::ConfigError;

/// Configuration loaded from (and written back to) a YAML file.
#[derive(Debug)]
pub struct FileConfig {
    path: PathBuf,
    data: ConfigData,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    service_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    output_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    escape_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    browser: Option<String>,
}

impl ConfigData {
    fn slot(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            "service_url" => Some(&mut self.service_url),
            "output_format" => Some(&mut self.output_format),
            "escape_html" => Some(&mut self.escape_html),
            "prompt" => Some(&mut self.prompt),
            "browser" => Some(&mut self.browser),
            _ => None,
        }
    }

    fn value(&self, key: &str) -> Option<&String> {
        match key {
            "service_url" => self.service_url.as_ref(),
            "output_format" => self.output_format.as_ref(),
            "escape_html" => self.escape_html.as_ref(),
            "prompt" => self.prompt.as_ref(),
            "browser" => self.browser.as_ref(),
            _ => None,
        }
    }
}

impl FileConfig {
    /// Load `config.yml` from [`config_dir`]. A missing file is an empty
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(config_dir().join("config.yml"))
    }

    /// Load configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| ConfigError::ReadFile {
                path: path.display().to_string(),
                source: e,
            })?;
            if content.trim().is_empty() {
                ConfigData::default()
            } else {
                serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
        } else {
            ConfigData::default()
        };
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(Self { path, data })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Config for FileConfig {
    fn get(&self, key: &str) -> Option<String> {
        if let Ok(val) = std::env::var(env_key(key)) {
            return Some(val);
        }
        self.data.value(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        validate(key, value)?;
        if let Some(slot) = self.data.slot(key) {
            *slot = Some(value.to_string());
        }
        Ok(())
    }

    fn write(&self) -> anyhow::Result<()> {
        let dir = self.path.parent().ok_or_else(|| {
            anyhow::anyhow!(
                "config path has no parent directory: {}",
                self.path.display()
            )
        })?;
        fs::create_dir_all(dir).map_err(|e| ConfigError::WriteFile {
            path: dir.display().to_string(),
            source: e,
        })?;

        let yaml =
            serde_yaml::to_string(&self.data).map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(&self.path, yaml).map_err(|e| ConfigError::WriteFile {
            path: self.path.display().to_string(),
            source: e,
        })?;
        tracing::debug!(path = %self.path.display(), "wrote configuration");
        Ok(())
    }
}
