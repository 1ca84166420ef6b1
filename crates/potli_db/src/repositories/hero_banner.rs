//! Repository for hero banners

use crate::error::DbError;
use crate::repository::Repository;
use std::future::Future;

pub use potli_common::models::HeroBanner;

pub trait HeroBannerRepository: Repository<HeroBanner, DbError> {
    fn init_schema(&self) -> impl Future<Output = Result<(), DbError>> + Send;

    /// Ordered by `sort_order`, then creation time. `is_active` filters when set.
    fn list(
        &self,
        is_active: Option<bool>,
    ) -> impl Future<Output = Result<Vec<HeroBanner>, DbError>> + Send;

    /// Highest `sort_order` in use, `None` when the table is empty.
    fn max_sort_order(&self) -> impl Future<Output = Result<Option<i64>, DbError>> + Send;
}
