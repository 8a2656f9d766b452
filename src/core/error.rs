//! Typed error handling for param-gate
//!
//! There are exactly two failure categories in this crate:
//!
//! - [`ConfigError`]: a rule references an unknown source name, or rule
//!   values are queried without a resolved source. Fatal at
//!   configuration-load time; should not occur at request time when the
//!   configuration is validated up front.
//! - [`ValidationError`]: a submitted parameter is absent from all of its
//!   allowed sources, or differs from the value found there. Surfaces as a
//!   client-visible request-denied response; not retried.
//!
//! # Example
//!
//! ```rust,ignore
//! match filter.check("delete", &submitted, &ctx) {
//!     GateDecision::Allowed => { /* run the action */ }
//!     GateDecision::Denied(violation) => {
//!         return Err(GateError::Validation(violation));
//!     }
//! }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::fmt;

use crate::core::source::ParamSource;

/// The main error type for param-gate
#[derive(Debug, Clone)]
pub enum GateError {
    /// Configuration errors (rule construction, source parsing)
    Config(ConfigError),

    /// Parameter validation failures (request denied)
    Validation(ValidationError),
}

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateError::Config(e) => write!(f, "{}", e),
            GateError::Validation(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for GateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GateError::Config(e) => Some(e),
            GateError::Validation(e) => Some(e),
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl GateError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Configuration problems are never the client's fault.
            GateError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GateError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            GateError::Config(e) => e.error_code(),
            GateError::Validation(e) => e.error_code(),
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            GateError::Validation(ValidationError::NotInAllowedSources { param, sources }) => {
                Some(serde_json::json!({
                    "param": param,
                    "allowed_sources": sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
                }))
            }
            GateError::Validation(ValidationError::ValueMismatch { param, source }) => {
                Some(serde_json::json!({
                    "param": param,
                    "source": source.name(),
                }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to filter configuration
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// A rule references a source name that does not exist
    UnknownSource { name: String },

    /// A rule declares an empty allowed-source list
    EmptySourceList,

    /// A rule value was requested although no allowed source provides it
    ValueUnresolved { param: String },

    /// Failed to parse a configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownSource { name } => {
                write!(f, "Unknown source for action params: '{}'", name)
            }
            ConfigError::EmptySourceList => {
                write!(f, "Allowed-source list must not be empty")
            }
            ConfigError::ValueUnresolved { param } => {
                write!(
                    f,
                    "No allowed source provides a value for param '{}'",
                    param
                )
            }
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::UnknownSource { .. } => "UNKNOWN_SOURCE",
            ConfigError::EmptySourceList => "EMPTY_SOURCE_LIST",
            ConfigError::ValueUnresolved { .. } => "VALUE_UNRESOLVED",
            ConfigError::ParseError { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::IoError { .. } => "CONFIG_IO_ERROR",
        }
    }
}

impl From<ConfigError> for GateError {
    fn from(err: ConfigError) -> Self {
        GateError::Config(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// A parameter validation failure; the request is denied
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The submitted parameter is absent from every allowed source
    NotInAllowedSources {
        param: String,
        sources: Vec<ParamSource>,
    },

    /// The submitted value differs from the value in the resolved source
    ValueMismatch { param: String, source: ParamSource },
}

impl ValidationError {
    /// The name of the offending parameter
    pub fn param(&self) -> &str {
        match self {
            ValidationError::NotInAllowedSources { param, .. } => param,
            ValidationError::ValueMismatch { param, .. } => param,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::NotInAllowedSources { .. } => "PARAM_NOT_IN_ALLOWED_SOURCES",
            ValidationError::ValueMismatch { .. } => "PARAM_VALUE_MISMATCH",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotInAllowedSources { param, sources } => {
                let names: Vec<&str> = sources.iter().map(|s| s.name()).collect();
                write!(
                    f,
                    "Param '{}' was not supplied by any allowed source ({})",
                    param,
                    names.join(", ")
                )
            }
            ValidationError::ValueMismatch { param, source } => {
                write!(
                    f,
                    "Param '{}' does not match the value found in source '{}'",
                    param, source
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for GateError {
    fn from(err: ValidationError) -> Self {
        GateError::Validation(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_yaml::Error> for GateError {
    fn from(err: serde_yaml::Error) -> Self {
        GateError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for GateError {
    fn from(err: std::io::Error) -> Self {
        GateError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for param-gate operations
pub type GateResult<T> = Result<T, GateError>;

// =============================================================================
// Tests
// =============================================================================
