//! Repository for admin users

use crate::error::DbError;
use crate::repository::Repository;
use std::future::Future;

pub use potli_common::models::AdminUser;

pub trait UserRepository: Repository<AdminUser, DbError> {
    fn init_schema(&self) -> impl Future<Output = Result<(), DbError>> + Send;

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<AdminUser>, DbError>> + Send;

    /// Oldest first.
    fn list(&self) -> impl Future<Output = Result<Vec<AdminUser>, DbError>> + Send;
}
