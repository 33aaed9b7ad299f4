//! LUT error types.

use thiserror::Error;
use tlut_io::IoError;

/// Result type for LUT operations.
pub type LutResult<T> = Result<T, LutError>;

/// Errors that can occur while preparing or configuring a tiled LUT.
#[derive(Debug, Error)]
pub enum LutError {
    /// The atlas image could not be read or decoded.
    ///
    /// No partial resource is ever produced alongside this error.
    #[error("failed to load LUT atlas '{source_name}': {cause}")]
    ResourceLoad {
        /// Path or label of the source that failed.
        source_name: String,
        /// Underlying decoder or file-system error.
        #[source]
        cause: IoError,
    },

    /// Layout parameters or atlas geometry are inconsistent.
    #[error("invalid LUT configuration: {0}")]
    Configuration(String),

    /// YAML parsing error in a layout file.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O error reading a layout file or spawning the loader thread.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LutError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// True for [`LutError::Configuration`].
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
