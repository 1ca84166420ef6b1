use potli_common::{HttpStatusCode, PotliError};
use potli_db::DbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Validation(String),

    /// Email delivery failed
    #[error("{0}")]
    Notification(String),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<AuthError> for PotliError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken | AuthError::InvalidToken(_) => PotliError::AuthError(err.to_string()),
            AuthError::Forbidden(msg) => PotliError::ForbiddenError(msg),
            AuthError::Validation(msg) => PotliError::ValidationError(msg),
            AuthError::Notification(msg) => potli_common::external_service_error("Notification", msg),
            AuthError::Database(e) => e.into(),
        }
    }
}

impl HttpStatusCode for AuthError {
    fn status_code(&self) -> u16 {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken(_) => 401,
            AuthError::Forbidden(_) => 403,
            AuthError::Validation(_) => 400,
            AuthError::Notification(_) => 502,
            AuthError::Database(_) => 500,
        }
    }
}
