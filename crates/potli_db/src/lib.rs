//! Database integration for the Potli backend
//!
//! A pooled `sqlx::Any` client plus one repository per entity: hero banners,
//! customers, admin users, invites and payment collections/sessions. SQLite
//! is the default backend; PostgreSQL and MySQL drivers are behind features.
//!
//! ```rust,no_run
//! use potli_db::{init_schemas, DbClient};
//!
//! async fn setup_db() -> Result<DbClient, potli_db::error::DbError> {
//!     let db = DbClient::from_url("sqlite://data/potli.db").await?;
//!     init_schemas(&db).await?;
//!     Ok(db)
//! }
//! ```

pub mod client;
pub mod error;
pub mod repositories;
pub mod repository;
mod row;

pub use client::DbClient;
pub use error::DbError;
pub use repository::{Repository, RepositoryFactory};

pub use repositories::{
    CustomerRepository, HeroBannerRepository, InviteRepository, PaymentRepository,
    SqlCustomerRepository, SqlHeroBannerRepository, SqlInviteRepository, SqlPaymentRepository,
    SqlRepositoryFactory, SqlUserRepository, UserRepository,
};

/// Prefixed random id, e.g. `hb_3f2a...`.
pub fn generate_id(prefix: &str) -> String {
    format!("{}_{}", prefix, uuid::Uuid::new_v4().simple())
}

/// Creates every table if missing.
pub async fn init_schemas(db_client: &DbClient) -> Result<(), DbError> {
    SqlHeroBannerRepository::new(db_client.clone()).init_schema().await?;
    SqlCustomerRepository::new(db_client.clone()).init_schema().await?;
    SqlUserRepository::new(db_client.clone()).init_schema().await?;
    SqlInviteRepository::new(db_client.clone()).init_schema().await?;
    SqlPaymentRepository::new(db_client.clone()).init_schema().await?;
    Ok(())
}
