//! Repository for payment collections and their sessions

use crate::error::DbError;
use std::future::Future;

pub use potli_common::models::{PaymentCollection, PaymentSession};

pub trait PaymentRepository {
    fn init_schema(&self) -> impl Future<Output = Result<(), DbError>> + Send;

    fn create_collection(
        &self,
        collection: PaymentCollection,
    ) -> impl Future<Output = Result<PaymentCollection, DbError>> + Send;

    fn find_collection(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<PaymentCollection>, DbError>> + Send;

    fn find_collection_by_cart(
        &self,
        cart_id: &str,
    ) -> impl Future<Output = Result<Option<PaymentCollection>, DbError>> + Send;

    fn update_collection(
        &self,
        collection: PaymentCollection,
    ) -> impl Future<Output = Result<PaymentCollection, DbError>> + Send;

    fn create_session(
        &self,
        session: PaymentSession,
    ) -> impl Future<Output = Result<PaymentSession, DbError>> + Send;

    fn find_session(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<PaymentSession>, DbError>> + Send;

    /// Oldest first.
    fn list_sessions(
        &self,
        payment_collection_id: &str,
    ) -> impl Future<Output = Result<Vec<PaymentSession>, DbError>> + Send;

    /// Persists status, amount, data and `authorized_at`.
    fn update_session(
        &self,
        session: PaymentSession,
    ) -> impl Future<Output = Result<PaymentSession, DbError>> + Send;
}
