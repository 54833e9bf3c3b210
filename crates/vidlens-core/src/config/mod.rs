//! Configuration system.
//!
//! Settings live in `config.yml` under [`config_dir`]. Every key can be
//! overridden with a `VIDLENS_<KEY>` environment variable.

mod file_config;
mod memory_config;

use std::path::PathBuf;

pub use file_config::FileConfig;
pub use memory_config::MemoryConfig;

use crate::errors::ConfigError;

/// Application directory name under the platform directories.
const APP_DIR: &str = "vidlens";

/// Configuration directory (usually `~/.config/vidlens`).
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("VIDLENS_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    dirs::config_dir().map_or_else(
        || {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
                .join(APP_DIR)
        },
        |d| d.join(APP_DIR),
    )
}

/// Cache directory, where report pages opened with `--web` are written.
pub fn cache_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("VIDLENS_CACHE_DIR") {
        return PathBuf::from(dir);
    }
    dirs::cache_dir().map_or_else(|| config_dir().join("cache"), |d| d.join(APP_DIR))
}

/// Environment variable overriding `key`.
pub fn env_key(key: &str) -> String {
    format!("VIDLENS_{}", key.to_uppercase())
}

/// Access to configuration settings.
pub trait Config: Send + Sync + std::fmt::Debug {
    /// Get an explicitly configured value.
    fn get(&self, key: &str) -> Option<String>;

    /// Set a value after checking it against [`CONFIG_OPTIONS`].
    ///
    /// # Errors
    ///
    /// Returns an error for unknown keys or values outside the allowed set.
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Persist the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be saved.
    fn write(&self) -> anyhow::Result<()>;

    /// Get a value, falling back to the key's default.
    fn get_or_default(&self, key: &str) -> String {
        self.get(key)
            .unwrap_or_else(|| default_for_key(key).to_string())
    }

    /// Base URL of the analysis service.
    fn service_url(&self) -> String {
        self.get_or_default("service_url")
    }

    /// Default report format for `analyze`.
    fn output_format(&self) -> String {
        self.get_or_default("output_format")
    }

    /// Whether analysis text is HTML-escaped before conversion.
    fn escape_html(&self) -> bool {
        self.get_or_default("escape_html") == "enabled"
    }

    /// Whether interactive prompts are allowed.
    fn prompt_enabled(&self) -> bool {
        self.get_or_default("prompt") != "disabled"
    }

    /// Browser launcher command, if configured.
    fn browser(&self) -> Option<String> {
        self.get("browser").filter(|b| !b.is_empty())
    }
}

/// A known configuration option.
#[derive(Debug)]
pub struct ConfigOption {
    /// Config key name.
    pub key: &'static str,
    /// Description of what this option does.
    pub description: &'static str,
    /// Valid values, empty means any string.
    pub allowed_values: &'static [&'static str],
    /// Default value.
    pub default_value: &'static str,
}

impl ConfigOption {
    /// Current value from `config`, or the default.
    pub fn current_value(&self, config: &dyn Config) -> String {
        config.get_or_default(self.key)
    }
}

/// Known configuration keys.
pub static CONFIG_OPTIONS: &[ConfigOption] = &[
    ConfigOption {
        key: "service_url",
        description: "base URL of the analysis service",
        allowed_values: &[],
        default_value: "http://127.0.0.1:8000/",
    },
    ConfigOption {
        key: "output_format",
        description: "default report format for analyze",
        allowed_values: &["text", "html", "fragment", "json"],
        default_value: "text",
    },
    ConfigOption {
        key: "escape_html",
        description: "escape HTML found in analysis text before converting it",
        allowed_values: &["enabled", "disabled"],
        default_value: "disabled",
    },
    ConfigOption {
        key: "prompt",
        description: "toggle interactive prompting in the terminal",
        allowed_values: &["enabled", "disabled"],
        default_value: "enabled",
    },
    ConfigOption {
        key: "browser",
        description: "the web browser to use for opening report pages",
        allowed_values: &[],
        default_value: "",
    },
];

/// Look up a known option.
pub fn option_for_key(key: &str) -> Option<&'static ConfigOption> {
    CONFIG_OPTIONS.iter().find(|o| o.key == key)
}

/// Default value for `key`, empty for unknown keys.
pub fn default_for_key(key: &str) -> &'static str {
    option_for_key(key).map_or("", |o| o.default_value)
}

/// Check that `key` is known and `value` is allowed for it.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownKey`] or [`ConfigError::InvalidValue`].
pub fn validate(key: &str, value: &str) -> Result<(), ConfigError> {
    let option = option_for_key(key).ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
    if option.allowed_values.is_empty() || option.allowed_values.contains(&value) {
        return Ok(());
    }
    let allowed: Vec<String> = option
        .allowed_values
        .iter()
        .map(|v| format!("'{v}'"))
        .collect();
    Err(ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        allowed: allowed.join(", "),
    })
}
