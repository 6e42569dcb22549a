//! Error types for the GenMedia MCP server.
//!
//! A single `Error` enum covers all failure classes so handlers can
//! propagate with `?` and the server boundary can map each class to the
//! right MCP error code.
//!
//! # Error Categories
//!
//! - `ConfigError`: missing or invalid configuration (fatal at startup)
//! - `Error::Validation`: malformed tool input, rejected before any remote call
//! - `Error::Api`: Gemini API call failures (includes endpoint and status)
//! - `Error::EmptyResponse`: the API succeeded but returned nothing usable
//! - `Error::Io`: reading caller-referenced input files
//!
//! Artifact-write failures are deliberately not represented here: writes are
//! best-effort and reported through the saved-files list (see
//! [`crate::artifacts`]). A video generation timeout is a status value on the
//! tool result, not an error.

use thiserror::Error;

/// Unified error type for the GenMedia MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors (missing env vars, invalid values)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// API errors with endpoint and HTTP status context.
    ///
    /// A status code of 0 marks a transport-level failure where no HTTP
    /// response was received.
    #[error("API error for {endpoint} (HTTP {status_code}): {message}")]
    Api {
        /// The API endpoint that was called
        endpoint: String,
        /// HTTP status code returned by the API
        status_code: u16,
        /// Error message from the API or describing the failure
        message: String,
    },

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// The API call succeeded but produced no candidates or predictions
    #[error("Empty response: {0}")]
    EmptyResponse(String),

    /// File system I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new API error with endpoint, status code, and message.
    pub fn api(endpoint: impl Into<String>, status_code: u16, message: impl Into<String>) -> Self {
        Error::Api {
            endpoint: endpoint.into(),
            status_code,
            message: message.into(),
        }
    }

    /// Create a new validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Create a new empty-response error.
    pub fn empty_response(message: impl Into<String>) -> Self {
        Error::EmptyResponse(message.into())
    }

    /// Collapse a list of field-level validation errors into one error.
    pub fn from_validation_errors(errors: Vec<ValidationError>) -> Self {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        Error::Validation(messages.join("; "))
    }
}

/// Configuration errors.
///
/// These occur when loading configuration from environment variables at
/// startup and are fatal: the process exits rather than serving requests
/// with a broken configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("Required environment variable {0} is not set")]
    MissingEnvVar(String),

    /// An environment variable has an invalid value
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl ConfigError {
    /// Create a new missing environment variable error.
    pub fn missing_env_var(name: impl Into<String>) -> Self {
        ConfigError::MissingEnvVar(name.into())
    }

    /// Create a new invalid value error.
    pub fn invalid_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue(name.into(), reason.into())
    }
}

/// Field-level validation error detail.
///
/// Handlers collect every failing field before rejecting a request so the
/// caller sees all problems at once.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error for a field.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result type alias using the unified Error type.
pub type Result<T> = std::result::Result<T, Error>;
