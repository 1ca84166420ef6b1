use potli_common::services::BoxedError;
use potli_common::{external_service_error, HttpStatusCode, PotliError};
use potli_db::DbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Payment provider {0} is not registered")]
    ProviderNotFound(String),

    #[error("Payment session {0} not found")]
    SessionNotFound(String),

    /// Operation not allowed in the session's current status
    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    Validation(String),

    /// Error raised by the gateway adapter
    #[error("{0}")]
    Provider(#[from] BoxedError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<PaymentError> for PotliError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::ProviderNotFound(_) | PaymentError::InvalidState(_) | PaymentError::Validation(_) => {
                PotliError::ValidationError(err.to_string())
            }
            PaymentError::SessionNotFound(_) => PotliError::NotFoundError(err.to_string()),
            PaymentError::Provider(e) => external_service_error("Payment provider", e),
            PaymentError::Database(e) => e.into(),
        }
    }
}

impl HttpStatusCode for PaymentError {
    fn status_code(&self) -> u16 {
        match self {
            PaymentError::ProviderNotFound(_) => 400,
            PaymentError::SessionNotFound(_) => 404,
            PaymentError::InvalidState(_) => 400,
            PaymentError::Validation(_) => 400,
            PaymentError::Provider(_) => 502,
            PaymentError::Database(_) => 500,
        }
    }
}
