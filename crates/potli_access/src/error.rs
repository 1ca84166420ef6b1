use potli_common::{HttpStatusCode, PotliError};
use potli_db::DbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccessError {
    #[error("User not found")]
    UserNotFound,

    #[error("Invalid or expired invite token.")]
    InvalidInvite,

    #[error("{0}")]
    Validation(String),

    #[error("User with this email already exists")]
    DuplicateUser,

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<AccessError> for PotliError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::UserNotFound => PotliError::NotFoundError(err.to_string()),
            AccessError::InvalidInvite => PotliError::AuthError(err.to_string()),
            AccessError::Validation(msg) => PotliError::ValidationError(msg),
            AccessError::DuplicateUser => PotliError::ConflictError(err.to_string()),
            AccessError::Database(e) => e.into(),
        }
    }
}

impl HttpStatusCode for AccessError {
    fn status_code(&self) -> u16 {
        match self {
            AccessError::UserNotFound => 404,
            AccessError::InvalidInvite => 401,
            AccessError::Validation(_) => 400,
            AccessError::DuplicateUser => 409,
            AccessError::Database(_) => 500,
        }
    }
}
