use potli_common::{external_service_error, HttpStatusCode, PotliError};
use thiserror::Error;

/// Resend-specific error types.
#[derive(Error, Debug)]
pub enum ResendError {
    /// Transport failure talking to the Resend API
    #[error("Failed to send email: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Non-success response from the Resend API
    #[error("Resend API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Missing provider option
    #[error("{0}")]
    ConfigError(String),

    /// Notification that cannot be sent as given
    #[error("{0}")]
    InvalidData(String),
}

impl From<ResendError> for PotliError {
    fn from(err: ResendError) -> Self {
        match err {
            ResendError::RequestError(e) => PotliError::HttpError(format!("Resend request error: {}", e)),
            ResendError::ApiError { status_code, message } => external_service_error(
                "Resend API",
                format!("Status: {}, Message: {}", status_code, message),
            ),
            ResendError::ConfigError(msg) => PotliError::ConfigError(msg),
            ResendError::InvalidData(msg) => PotliError::ValidationError(msg),
        }
    }
}

impl HttpStatusCode for ResendError {
    fn status_code(&self) -> u16 {
        match self {
            ResendError::RequestError(_) => 500,
            ResendError::ApiError { .. } => 502,
            ResendError::ConfigError(_) => 500,
            ResendError::InvalidData(_) => 400,
        }
    }
}
