use http::StatusCode;
use thiserror::Error;

/// Main error type for the Ghibli Studio library
#[derive(Error, Debug)]
pub enum StudioError {
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Style error: {0}")]
    Style(#[from] StyleError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Errors raised at the boundary of the color-grading filter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid input image: {reason}")]
    InvalidInput { reason: String },

    #[error("Could not allocate {bytes} bytes for an image buffer")]
    AllocationFailure { bytes: usize },
}

/// Errors converting between encoded payloads and raster images
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Payload is not valid base64: {reason}")]
    InvalidBase64 { reason: String },

    #[error("Image decoding failed: {reason}")]
    DecodeFailed { reason: String },

    #[error("Image encoding failed: {reason}")]
    EncodeFailed { reason: String },
}

/// Style-specific errors
#[derive(Error, Debug)]
pub enum StyleError {
    #[error("Style not found: {name}")]
    NotFound { name: String, available: Vec<String> },

    #[error("Style configuration invalid: {details}")]
    InvalidConfig { details: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path} ({reason})")]
    ParseFailed { path: String, reason: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// HTTP transport errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Bad request: {reason}")]
    BadRequest { reason: String },

    #[error("Request body of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Could not bind {address}: {reason}")]
    Bind { address: String, reason: String },
}

/// Convenience type alias for Results using StudioError
pub type Result<T> = std::result::Result<T, StudioError>;

impl StudioError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Whether the caller sent something we could not work with
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// HTTP status used when this error ends a request
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Filter(FilterError::InvalidInput { .. }) => StatusCode::BAD_REQUEST,
            Self::Codec(CodecError::InvalidBase64 { .. })
            | Self::Codec(CodecError::DecodeFailed { .. }) => StatusCode::BAD_REQUEST,
            Self::Server(ServerError::BadRequest { .. }) => StatusCode::BAD_REQUEST,
            Self::Server(ServerError::PayloadTooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Codec(CodecError::DecodeFailed { .. }) => {
                "Could not read the uploaded image. Please send a PNG or JPEG file.".to_string()
            }
            Self::Style(StyleError::NotFound { name, available }) if available.is_empty() => {
                format!("Style '{}' not found.", name)
            }
            Self::Style(StyleError::NotFound { name, available }) => {
                format!(
                    "Style '{}' not found. Available styles: {}",
                    name,
                    available.join(", ")
                )
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
