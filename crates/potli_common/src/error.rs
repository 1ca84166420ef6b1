// --- File: crates/potli_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type shared by all Potli crates.
///
/// Each crate keeps its own error enum and implements `From<CrateError> for PotliError`.
#[derive(Error, Debug)]
pub enum PotliError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Missing or invalid credentials
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Authenticated, but not allowed
    #[error("Forbidden: {0}")]
    ForbiddenError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during database operation
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a conflict (e.g., resource already exists)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Maps an error onto the HTTP status it should produce.
pub trait HttpStatusCode {
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for PotliError {
    fn status_code(&self) -> u16 {
        match self {
            PotliError::HttpError(_) => 500,
            PotliError::ParseError(_) => 400,
            PotliError::ConfigError(_) => 500,
            PotliError::AuthError(_) => 401,
            PotliError::ForbiddenError(_) => 403,
            PotliError::ValidationError(_) => 400,
            PotliError::DatabaseError(_) => 500,
            PotliError::ExternalServiceError { .. } => 502,
            PotliError::ConflictError(_) => 409,
            PotliError::NotFoundError(_) => 404,
            PotliError::InternalError(_) => 500,
        }
    }
}

impl From<std::io::Error> for PotliError {
    fn from(err: std::io::Error) -> Self {
        PotliError::InternalError(err.to_string())
    }
}

pub fn config_error<T: fmt::Display>(message: T) -> PotliError {
    PotliError::ConfigError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> PotliError {
    PotliError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}
