//! Core error types for the vidlens CLI.

/// Errors originating from core operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CoreError {
    /// Configuration file read/write error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A video URL that is not an absolute `http`/`https` URL.
    #[error("invalid video URL {url:?}: {reason}")]
    InvalidUrl {
        /// The rejected input.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Configuration-specific errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Failed to read config file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path of the config file.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write config file.
    #[error("failed to write config file {path}: {source}")]
    WriteFile {
        /// Path of the config file.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse config.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// A key that is not a known configuration option.
    #[error("unknown configuration key {0:?}")]
    UnknownKey(String),

    /// A value outside the allowed set for its key.
    #[error("invalid value {value:?} for {key:?}: valid values are {allowed}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Rejected value.
        value: String,
        /// Human-readable list of accepted values.
        allowed: String,
    },
}
