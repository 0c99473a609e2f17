//! Error types for the Scribe extraction pipeline.
//!
//! Every failure the pipeline can report is one variant of [`OcrError`], so
//! callers can match on the whole family or on a single kind. Each layer
//! classifies the failures it understands and passes already-classified
//! errors through untouched.

use thiserror::Error;

/// Top-level error type for Scribe operations.
#[derive(Error, Debug)]
pub enum OcrError {
    /// A required setting is missing or a setting could not be parsed
    #[error("{0}")]
    Configuration(String),

    /// The image could not be opened, decoded, or has invalid properties
    #[error("{0}")]
    ImageLoad(String),

    /// An input path is invalid or a text file could not be read
    #[error("{0}")]
    Validation(String),

    /// The remote call failed or returned an unusable response
    #[error("{message}")]
    Api {
        message: String,
        /// HTTP status, when the failure came from a non-2xx response
        status_code: Option<u16>,
    },

    /// The response text is not valid JSON
    #[error("{0}")]
    JsonParse(String),

    /// Any other failure inside the pipeline
    #[error("Pipeline execution failed: {0}")]
    Pipeline(String),
}

/// Stable tag for each [`OcrError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    ImageLoad,
    Validation,
    Api,
    JsonParse,
    Pipeline,
}

impl OcrError {
    /// Build an API error without an HTTP status.
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            status_code: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::ImageLoad(_) => ErrorKind::ImageLoad,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Api { .. } => ErrorKind::Api,
            Self::JsonParse(_) => ErrorKind::JsonParse,
            Self::Pipeline(_) => ErrorKind::Pipeline,
        }
    }

    /// Only remote-call failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

/// Errors raised while loading the operational TOML config.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for OcrError {
    fn from(err: ConfigError) -> Self {
        OcrError::Configuration(err.to_string())
    }
}

/// Convenience type alias for Scribe results.
pub type Result<T> = std::result::Result<T, OcrError>;
