//! Repository for admin invites

use crate::error::DbError;
use crate::repository::Repository;
use chrono::{DateTime, Utc};
use std::future::Future;

pub use potli_common::models::Invite;

pub trait InviteRepository: Repository<Invite, DbError> {
    fn init_schema(&self) -> impl Future<Output = Result<(), DbError>> + Send;

    fn find_by_token(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Option<Invite>, DbError>> + Send;

    /// Flips `accepted` only if it is still unset. `false` means another
    /// caller got there first.
    fn mark_accepted(
        &self,
        id: &str,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<bool, DbError>> + Send;

    /// Newest first.
    fn list(&self) -> impl Future<Output = Result<Vec<Invite>, DbError>> + Send;
}
