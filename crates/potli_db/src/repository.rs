//! Repository traits for database access
//!
//! Entity repositories extend [`Repository`] with their own queries; the SQL
//! implementations live in `repositories/*_sql.rs`.

use std::error::Error;
use std::fmt::Debug;
use std::future::Future;

/// CRUD by string id.
pub trait Repository<T, E>
where
    T: Clone + Debug,
    E: Error + Debug,
{
    /// Inserts `entity` as given; ids and timestamps are assigned by the caller.
    fn create(&self, entity: T) -> impl Future<Output = Result<T, E>> + Send;

    fn read(&self, id: &str) -> impl Future<Output = Result<Option<T>, E>> + Send;

    /// Overwrites every column of the stored row.
    fn update(&self, entity: T) -> impl Future<Output = Result<T, E>> + Send;

    /// `true` if a row was removed.
    fn delete(&self, id: &str) -> impl Future<Output = Result<bool, E>> + Send;
}

/// Builds repositories from a shared resource such as a [`crate::DbClient`].
pub trait RepositoryFactory<R, C> {
    fn create_repository(&self, config: C) -> R;
}
