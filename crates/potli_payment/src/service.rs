//! The payment module.
//!
//! Owns payment collections (one per cart) and the sessions opened against
//! registered providers. Every state change goes through the provider first
//! and is persisted only once the provider accepted it.

use crate::error::PaymentError;
use crate::logic::{collection_status, is_open};
use chrono::Utc;
use potli_common::models::{PaymentCollection, PaymentData, PaymentSession, PaymentSessionStatus};
use potli_common::services::{BoxedError, InitiatePaymentInput, PaymentContext, PaymentProvider};
use potli_db::{generate_id, DbClient, PaymentRepository, SqlPaymentRepository};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

pub type SharedPaymentProvider = Arc<dyn PaymentProvider<Error = BoxedError>>;

/// Session data key holding the sum of accepted refunds, in minor units.
pub const REFUNDED_TOTAL_KEY: &str = "refunded_total";

fn refunded_total(data: &PaymentData) -> i64 {
    data.get(REFUNDED_TOTAL_KEY).and_then(|v| v.as_i64()).unwrap_or(0)
}

#[derive(Debug, Clone, Default)]
pub struct CreatePaymentSessionInput {
    pub cart_id: String,
    pub provider_id: String,
    /// Minor units.
    pub amount: i64,
    pub currency_code: String,
    pub region_id: Option<String>,
    pub customer_id: Option<String>,
    pub email: Option<String>,
    pub data: PaymentData,
}

pub struct PaymentModule {
    repo: SqlPaymentRepository,
    providers: HashMap<String, SharedPaymentProvider>,
}

impl PaymentModule {
    pub fn new(db_client: DbClient) -> Self {
        Self {
            repo: SqlPaymentRepository::new(db_client),
            providers: HashMap::new(),
        }
    }

    /// Registers `provider` under its `pp_{identifier}_{identifier}` id.
    pub fn register_provider(&mut self, provider: SharedPaymentProvider) {
        let provider_id = provider.provider_id();
        info!("ℹ️ Registered payment provider {}", provider_id);
        self.providers.insert(provider_id, provider);
    }

    pub fn with_provider(mut self, provider: SharedPaymentProvider) -> Self {
        self.register_provider(provider);
        self
    }

    pub fn provider_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.providers.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn provider(&self, provider_id: &str) -> Result<SharedPaymentProvider, PaymentError> {
        self.providers
            .get(provider_id)
            .cloned()
            .ok_or_else(|| PaymentError::ProviderNotFound(provider_id.to_string()))
    }

    pub async fn find_collection_by_cart(
        &self,
        cart_id: &str,
    ) -> Result<Option<PaymentCollection>, PaymentError> {
        Ok(self.repo.find_collection_by_cart(cart_id).await?)
    }

    /// Oldest first.
    pub async fn list_sessions(
        &self,
        payment_collection_id: &str,
    ) -> Result<Vec<PaymentSession>, PaymentError> {
        Ok(self.repo.list_sessions(payment_collection_id).await?)
    }

    pub async fn retrieve_session(&self, id: &str) -> Result<PaymentSession, PaymentError> {
        self.repo
            .find_session(id)
            .await?
            .ok_or_else(|| PaymentError::SessionNotFound(id.to_string()))
    }

    async fn upsert_collection(
        &self,
        input: &CreatePaymentSessionInput,
        currency_code: &str,
    ) -> Result<PaymentCollection, PaymentError> {
        let now = Utc::now();
        match self.repo.find_collection_by_cart(&input.cart_id).await? {
            Some(mut collection) => {
                collection.amount = input.amount;
                collection.currency_code = currency_code.to_string();
                if input.region_id.is_some() {
                    collection.region_id = input.region_id.clone();
                }
                collection.updated_at = now;
                Ok(self.repo.update_collection(collection).await?)
            }
            None => {
                let collection = PaymentCollection {
                    id: generate_id("pay_col"),
                    cart_id: input.cart_id.clone(),
                    region_id: input.region_id.clone(),
                    currency_code: currency_code.to_string(),
                    amount: input.amount,
                    status: collection_status(PaymentSessionStatus::Pending).to_string(),
                    created_at: now,
                    updated_at: now,
                };
                Ok(self.repo.create_collection(collection).await?)
            }
        }
    }

    /// Opens a session for the cart, creating its collection on first use.
    /// Open sessions of the same provider are canceled first.
    pub async fn create_session(
        &self,
        input: CreatePaymentSessionInput,
    ) -> Result<PaymentSession, PaymentError> {
        if input.cart_id.trim().is_empty() {
            return Err(PaymentError::Validation("cart_id is required".to_string()));
        }
        let provider = self.provider(&input.provider_id)?;
        let currency_code = input.currency_code.to_lowercase();
        let collection = self.upsert_collection(&input, &currency_code).await?;

        for mut stale in self.repo.list_sessions(&collection.id).await? {
            if stale.provider_id != input.provider_id || !is_open(stale.status) {
                continue;
            }
            if let Err(e) = provider.delete_payment(stale.data.clone()).await {
                warn!("Failed to release payment session {}: {}", stale.id, e);
            }
            stale.status = PaymentSessionStatus::Canceled;
            stale.updated_at = Utc::now();
            self.repo.update_session(stale).await?;
        }

        let output = provider
            .initiate_payment(InitiatePaymentInput {
                amount: input.amount as f64,
                currency_code: currency_code.clone(),
                context: PaymentContext {
                    cart_id: Some(input.cart_id.clone()),
                    region_id: input.region_id.clone(),
                    customer_id: input.customer_id.clone(),
                    email: input.email.clone(),
                },
                data: input.data,
            })
            .await?;

        let now = Utc::now();
        let session = PaymentSession {
            id: generate_id("payses"),
            payment_collection_id: collection.id,
            provider_id: input.provider_id,
            amount: input.amount,
            currency_code,
            status: output.status,
            data: output.data,
            authorized_at: None,
            created_at: now,
            updated_at: now,
        };
        info!(
            "Created payment session {} ({}) for cart {}",
            session.id, session.provider_id, input.cart_id
        );
        Ok(self.repo.create_session(session).await?)
    }

    async fn save(&self, mut session: PaymentSession) -> Result<PaymentSession, PaymentError> {
        session.updated_at = Utc::now();
        let session = self.repo.update_session(session).await?;

        if let Some(mut collection) = self.repo.find_collection(&session.payment_collection_id).await? {
            let status = collection_status(session.status);
            if collection.status != status {
                collection.status = status.to_string();
                collection.updated_at = session.updated_at;
                self.repo.update_collection(collection).await?;
            }
        }
        Ok(session)
    }

    /// `context` is what the storefront collected from the checkout widget.
    /// Already authorized or captured sessions are returned unchanged.
    pub async fn authorize_session(
        &self,
        id: &str,
        context: PaymentData,
    ) -> Result<PaymentSession, PaymentError> {
        let mut session = self.retrieve_session(id).await?;
        match session.status {
            PaymentSessionStatus::Authorized | PaymentSessionStatus::Captured => return Ok(session),
            PaymentSessionStatus::Canceled => {
                return Err(PaymentError::InvalidState(format!(
                    "Payment session {} is canceled",
                    id
                )))
            }
            _ => {}
        }

        let provider = self.provider(&session.provider_id)?;
        let output = provider.authorize_payment(session.data.clone(), context).await?;

        session.status = output.status;
        session.data = output.data;
        if matches!(
            output.status,
            PaymentSessionStatus::Authorized | PaymentSessionStatus::Captured
        ) {
            session.authorized_at = Some(Utc::now());
        }
        info!("Payment session {} is now {}", session.id, session.status);
        self.save(session).await
    }

    pub async fn capture_session(&self, id: &str) -> Result<PaymentSession, PaymentError> {
        let mut session = self.retrieve_session(id).await?;
        match session.status {
            PaymentSessionStatus::Captured => return Ok(session),
            PaymentSessionStatus::Authorized => {}
            other => {
                return Err(PaymentError::InvalidState(format!(
                    "Payment session {} cannot be captured while {}",
                    id, other
                )))
            }
        }

        let provider = self.provider(&session.provider_id)?;
        session.data = provider.capture_payment(session.data.clone()).await?;
        session.status = PaymentSessionStatus::Captured;
        info!("Captured payment session {}", session.id);
        self.save(session).await
    }

    /// `amount` in minor units.
    pub async fn refund_session(&self, id: &str, amount: i64) -> Result<PaymentSession, PaymentError> {
        if amount <= 0 {
            return Err(PaymentError::Validation(
                "Refund amount must be greater than zero".to_string(),
            ));
        }
        let mut session = self.retrieve_session(id).await?;
        if session.status != PaymentSessionStatus::Captured {
            return Err(PaymentError::InvalidState(format!(
                "Payment session {} has not been captured",
                id
            )));
        }
        let refunded = refunded_total(&session.data);
        let refundable = session.amount - refunded;
        if amount > refundable {
            return Err(PaymentError::Validation(format!(
                "Refund amount {} exceeds the refundable amount {} (captured {}, refunded {})",
                amount, refundable, session.amount, refunded
            )));
        }

        let provider = self.provider(&session.provider_id)?;
        session.data = provider.refund_payment(session.data.clone(), amount as f64).await?;
        session
            .data
            .insert(REFUNDED_TOTAL_KEY.to_string(), (refunded + amount).into());
        info!("Refunded {} on payment session {}", amount, session.id);
        self.save(session).await
    }

    pub async fn cancel_session(&self, id: &str) -> Result<PaymentSession, PaymentError> {
        let mut session = self.retrieve_session(id).await?;
        if session.status == PaymentSessionStatus::Canceled {
            return Ok(session);
        }

        let provider = self.provider(&session.provider_id)?;
        session.data = provider.cancel_payment(session.data.clone()).await?;
        session.status = PaymentSessionStatus::Canceled;
        info!("Canceled payment session {}", session.id);
        self.save(session).await
    }

    /// Asks the provider for the current status and persists a change.
    pub async fn refresh_session_status(&self, id: &str) -> Result<PaymentSession, PaymentError> {
        let mut session = self.retrieve_session(id).await?;
        let provider = self.provider(&session.provider_id)?;
        let status = provider.get_payment_status(session.data.clone()).await?;

        // A pending answer never downgrades a settled session.
        if status == session.status || (status == PaymentSessionStatus::Pending && !is_open(session.status)) {
            return Ok(session);
        }
        info!(
            "Payment session {} moved from {} to {}",
            session.id, session.status, status
        );
        if session.authorized_at.is_none()
            && matches!(status, PaymentSessionStatus::Authorized | PaymentSessionStatus::Captured)
        {
            session.authorized_at = Some(Utc::now());
        }
        session.status = status;
        self.save(session).await
    }
}
