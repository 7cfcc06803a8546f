//! Error types for configuration handling

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, validating or saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// No platform config directory could be determined
    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value parsed fine but is out of range
    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
