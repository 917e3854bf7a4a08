//! Scroll engine error types

use thiserror::Error;

/// Errors raised while building or configuring a scroll controller
#[derive(Error, Debug)]
pub enum GlideError {
    /// An option value is out of range
    #[error("Invalid option `{name}`: {reason}")]
    InvalidOption { name: &'static str, reason: String },

    /// Options could not be parsed from TOML
    #[error("Config parse failed: {0}")]
    Config(#[from] toml::de::Error),

    /// Options could not be serialized to TOML
    #[error("Config serialize failed: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl GlideError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        GlideError::InvalidOption {
            name,
            reason: reason.into(),
        }
    }
}

/// Result type for scroll engine operations
pub type Result<T> = std::result::Result<T, GlideError>;
