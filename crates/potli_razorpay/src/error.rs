use potli_common::{external_service_error, HttpStatusCode, PotliError};
use thiserror::Error;

/// Razorpay-specific error types.
#[derive(Error, Debug)]
pub enum RazorpayError {
    /// Error occurred during a Razorpay API request
    #[error("Razorpay API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the Razorpay API
    #[error("{message}")]
    ApiError { status_code: u16, message: String },

    /// Error parsing a Razorpay API response
    #[error("Failed to parse Razorpay API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing or incomplete Razorpay configuration
    #[error("{0}")]
    ConfigError(String),

    /// Input the gateway would reject, or a verification check that failed
    #[error("{0}")]
    InvalidData(String),

    /// A provider operation failed; `operation` names it for the caller
    #[error("{operation}: {source}")]
    OperationFailed {
        operation: &'static str,
        #[source]
        source: Box<RazorpayError>,
    },
}

impl RazorpayError {
    /// Prefixes the error with the provider operation it broke.
    pub fn during(operation: &'static str) -> impl FnOnce(RazorpayError) -> RazorpayError {
        move |source| RazorpayError::OperationFailed {
            operation,
            source: Box::new(source),
        }
    }
}

impl From<RazorpayError> for PotliError {
    fn from(err: RazorpayError) -> Self {
        match err {
            RazorpayError::RequestError(e) => PotliError::HttpError(format!("Razorpay request error: {}", e)),
            RazorpayError::ApiError { status_code, message } => external_service_error(
                "Razorpay API",
                format!("Status: {}, Message: {}", status_code, message),
            ),
            RazorpayError::ParseError(e) => PotliError::ParseError(format!("Razorpay response parse error: {}", e)),
            RazorpayError::ConfigError(msg) => PotliError::ConfigError(msg),
            RazorpayError::InvalidData(msg) => PotliError::ValidationError(msg),
            err @ RazorpayError::OperationFailed { .. } => external_service_error("Razorpay", err),
        }
    }
}

impl HttpStatusCode for RazorpayError {
    fn status_code(&self) -> u16 {
        match self {
            RazorpayError::RequestError(_) => 500,
            RazorpayError::ApiError { status_code, .. } => *status_code,
            RazorpayError::ParseError(_) => 502,
            RazorpayError::ConfigError(_) => 500,
            RazorpayError::InvalidData(_) => 400,
            RazorpayError::OperationFailed { source, .. } => source.status_code(),
        }
    }
}
