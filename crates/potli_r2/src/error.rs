use potli_common::{external_service_error, HttpStatusCode, PotliError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum R2Error {
    /// A required R2 option is missing
    #[error("{0} is required for R2 file provider")]
    MissingOption(&'static str),

    /// File handed to the provider cannot be stored
    #[error("{0}")]
    InvalidData(String),

    /// PutObject failed
    #[error("Cloudflare R2 upload failed: {0}")]
    UploadError(String),
}

impl From<R2Error> for PotliError {
    fn from(err: R2Error) -> Self {
        match err {
            R2Error::MissingOption(_) => PotliError::ConfigError(err.to_string()),
            R2Error::InvalidData(msg) => PotliError::ValidationError(msg),
            R2Error::UploadError(msg) => external_service_error("Cloudflare R2", msg),
        }
    }
}

impl HttpStatusCode for R2Error {
    fn status_code(&self) -> u16 {
        match self {
            R2Error::MissingOption(_) => 500,
            R2Error::InvalidData(_) => 400,
            R2Error::UploadError(_) => 502,
        }
    }
}
