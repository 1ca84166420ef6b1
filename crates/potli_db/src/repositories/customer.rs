//! Repository for storefront customers

use crate::error::DbError;
use crate::repository::Repository;
use std::future::Future;

pub use potli_common::models::Customer;

pub trait CustomerRepository: Repository<Customer, DbError> {
    fn init_schema(&self) -> impl Future<Output = Result<(), DbError>> + Send;

    /// Case-insensitive lookup.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<Customer>, DbError>> + Send;
}
