//! Error types for the core crate.

use thiserror::Error;

/// Failures reported by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Storage is not available (e.g., in incognito mode)
    #[error("storage not available")]
    NotAvailable,
    /// Storage quota exceeded
    #[error("storage quota exceeded")]
    QuotaExceeded,
    /// Access denied
    #[error("storage access denied")]
    AccessDenied,
}

/// Errors loading a defaults file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid YAML for the defaults schema.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// A palette entry is not a color the panel accepts.
    #[error("invalid color '{color}' in {kind} palette: {source}")]
    InvalidColor {
        /// Kind whose palette holds the color
        kind: String,
        /// Offending entry
        color: String,
        /// Parse failure
        source: crate::color::ColorParseError,
    },

    /// A palette is empty.
    #[error("{0} palette must hold at least one color")]
    EmptyPalette(String),

    /// A tuning constant is out of its valid range.
    #[error("invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Error message
        message: String,
    },
}
