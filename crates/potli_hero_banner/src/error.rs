use potli_common::{HttpStatusCode, PotliError};
use potli_db::DbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeroBannerError {
    #[error("Hero banner not found")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<HeroBannerError> for PotliError {
    fn from(err: HeroBannerError) -> Self {
        match err {
            HeroBannerError::NotFound(id) => PotliError::NotFoundError(format!("hero banner {}", id)),
            HeroBannerError::Validation(msg) => PotliError::ValidationError(msg),
            HeroBannerError::Database(e) => e.into(),
        }
    }
}

impl HttpStatusCode for HeroBannerError {
    fn status_code(&self) -> u16 {
        match self {
            HeroBannerError::NotFound(_) => 404,
            HeroBannerError::Validation(_) => 400,
            HeroBannerError::Database(_) => 500,
        }
    }
}
