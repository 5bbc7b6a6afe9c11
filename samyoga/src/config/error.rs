//! Configuration loading errors.

use thiserror::Error;

/// Config load error
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Serialization error
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
