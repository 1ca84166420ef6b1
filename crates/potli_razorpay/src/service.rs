//! Razorpay as a [`PaymentProvider`].
//!
//! A session maps to a Razorpay order. The storefront opens the Razorpay
//! checkout with that order, then posts the returned payment id and signature
//! back for authorization. Amounts are always minor units (paise).

use crate::client::{CreateOrderRequest, RazorpayClient, RazorpayPayment};
use crate::error::RazorpayError;
use crate::logic::{
    data_str, map_payment_status, merge, receipt, to_minor_units, verify_payment_signature,
};
use chrono::Utc;
use potli_common::services::{
    AuthorizePaymentOutput, BoxFuture, InitiatePaymentInput, InitiatePaymentOutput, PaymentAction,
    PaymentData, PaymentProvider, PaymentSessionStatus, WebhookActionResult, WebhookPayload,
};
use potli_config::RazorpayConfig;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{debug, info, warn};

const DEFAULT_CURRENCY: &str = "INR";

#[derive(Debug, Clone)]
pub struct RazorpayProviderService {
    client: RazorpayClient,
    config: RazorpayConfig,
}

/// A payment without an order id leaves the session's order id in place.
fn payment_fields(payment: &RazorpayPayment) -> Vec<(&'static str, Value)> {
    let mut fields = vec![
        ("razorpay_payment_id", json!(payment.id)),
        ("amount", json!(payment.amount)),
        ("currency", json!(payment.currency)),
        ("status", json!(payment.status)),
        ("captured", json!(payment.captured)),
    ];
    if let Some(order_id) = &payment.order_id {
        fields.push(("razorpay_order_id", json!(order_id)));
    }
    fields
}

impl RazorpayProviderService {
    pub const IDENTIFIER: &'static str = "razorpay";

    pub fn new(config: RazorpayConfig) -> Result<Self, RazorpayError> {
        if config.key_id.trim().is_empty() || config.key_secret.trim().is_empty() {
            return Err(RazorpayError::ConfigError(
                "RAZORPAY_KEY_ID and RAZORPAY_KEY_SECRET are required".to_string(),
            ));
        }
        let client = RazorpayClient::new(
            &config.key_id,
            &config.key_secret,
            config.api_base_url.as_deref(),
        );
        Ok(Self { client, config })
    }

    fn payment_id(data: &PaymentData) -> Result<String, RazorpayError> {
        data_str(data, "razorpay_payment_id")
            .map(str::to_string)
            .ok_or_else(|| {
                RazorpayError::InvalidData("Missing razorpay_payment_id in session data".to_string())
            })
    }

    pub async fn create_order(
        &self,
        input: InitiatePaymentInput,
    ) -> Result<InitiatePaymentOutput, RazorpayError> {
        let amount = to_minor_units(input.amount).ok_or_else(|| {
            RazorpayError::InvalidData("Amount must be greater than zero".to_string())
        })?;
        let currency = Some(input.currency_code.trim())
            .filter(|c| !c.is_empty())
            .or(self.config.default_currency.as_deref())
            .unwrap_or(DEFAULT_CURRENCY)
            .to_uppercase();

        let random = uuid::Uuid::new_v4().simple().to_string();
        let receipt = receipt(Utc::now().timestamp_millis(), &random[..6]);

        let mut notes = HashMap::new();
        let cart_id = input
            .context
            .cart_id
            .clone()
            .or_else(|| data_str(&input.data, "cart_id").map(str::to_string));
        let region_id = input
            .context
            .region_id
            .clone()
            .or_else(|| data_str(&input.data, "region_id").map(str::to_string));
        if let Some(cart_id) = cart_id {
            notes.insert("potli_cart_id".to_string(), cart_id);
        }
        if let Some(region_id) = region_id {
            notes.insert("potli_region_id".to_string(), region_id);
        }

        let order = self
            .client
            .create_order(&CreateOrderRequest {
                amount,
                currency,
                receipt,
                notes,
            })
            .await?;
        info!("Created Razorpay order {} for {} {}", order.id, order.amount, order.currency);

        let data = merge(
            input.data,
            [
                ("razorpay_order_id", json!(order.id)),
                ("amount", json!(order.amount)),
                ("currency", json!(order.currency)),
                ("receipt", json!(order.receipt)),
            ],
        );
        Ok(InitiatePaymentOutput {
            id: order.id,
            status: PaymentSessionStatus::Pending,
            data,
        })
    }

    /// Verifies the checkout signature, then confirms the payment with Razorpay.
    pub async fn authorize(
        &self,
        data: PaymentData,
        context: PaymentData,
    ) -> Result<AuthorizePaymentOutput, RazorpayError> {
        let payment_id = data_str(&context, "razorpay_payment_id");
        let order_id =
            data_str(&context, "razorpay_order_id").or_else(|| data_str(&data, "razorpay_order_id"));
        let signature = data_str(&context, "razorpay_signature");

        let (Some(payment_id), Some(order_id), Some(signature)) = (payment_id, order_id, signature)
        else {
            return Err(RazorpayError::InvalidData(
                "Missing required payment verification data".to_string(),
            ));
        };

        if let Some(session_order) = data_str(&data, "razorpay_order_id") {
            if session_order != order_id {
                return Err(RazorpayError::InvalidData(
                    "Razorpay order_id mismatch for this payment session".to_string(),
                ));
            }
        }

        if !verify_payment_signature(&self.config.key_secret, order_id, payment_id, signature) {
            warn!("Invalid Razorpay signature for payment {}", payment_id);
            return Err(RazorpayError::InvalidData("Invalid payment signature".to_string()));
        }

        let payment = self.client.fetch_payment(payment_id).await?;
        // Razorpay omits order_id for payments made outside an order.
        if payment.order_id.as_deref().is_some_and(|o| o != order_id) {
            return Err(RazorpayError::InvalidData(
                "Razorpay payment does not belong to this order".to_string(),
            ));
        }

        let status = match payment.status.as_str() {
            "captured" => PaymentSessionStatus::Captured,
            "authorized" => PaymentSessionStatus::Authorized,
            other => {
                return Err(RazorpayError::InvalidData(format!("Payment status is {}", other)))
            }
        };
        info!("Razorpay payment {} verified ({})", payment.id, payment.status);

        let signature = signature.to_string();
        let mut fields = payment_fields(&payment);
        fields.extend([
            ("razorpay_signature", json!(signature)),
            ("method", json!(payment.method)),
            ("created_at", json!(payment.created_at)),
        ]);
        Ok(AuthorizePaymentOutput {
            status,
            data: merge(data, fields),
        })
    }

    pub async fn capture(&self, data: PaymentData) -> Result<PaymentData, RazorpayError> {
        let payment_id = Self::payment_id(&data)?;
        let payment = self.client.fetch_payment(&payment_id).await?;
        if payment.status == "captured" {
            debug!("Razorpay payment {} already captured", payment_id);
            return Ok(merge(data, payment_fields(&payment)));
        }

        let captured = self
            .client
            .capture_payment(&payment_id, payment.amount, &payment.currency)
            .await?;
        info!("Captured Razorpay payment {}", captured.id);
        Ok(merge(data, payment_fields(&captured)))
    }

    /// Refunds a captured payment; anything else is only marked canceled.
    pub async fn cancel(&self, data: PaymentData) -> Result<PaymentData, RazorpayError> {
        let Some(payment_id) = data_str(&data, "razorpay_payment_id").map(str::to_string) else {
            return Ok(merge(data, [("status", json!("canceled"))]));
        };

        let payment = self.client.fetch_payment(&payment_id).await?;
        if payment.status == "captured" {
            if let Err(e) = self.client.refund_payment(&payment_id, payment.amount).await {
                warn!("Refund on cancel failed for {}: {}", payment_id, e);
            }
        }
        Ok(merge(data, [("status", json!("canceled"))]))
    }

    pub async fn retrieve(&self, data: PaymentData) -> Result<PaymentData, RazorpayError> {
        let payment_id = data_str(&data, "razorpay_payment_id")
            .map(str::to_string)
            .ok_or_else(|| RazorpayError::InvalidData("Missing razorpay_payment_id".to_string()))?;
        let payment = self.client.fetch_payment(&payment_id).await?;
        Ok(merge(data, payment_fields(&payment)))
    }

    pub async fn refund(&self, data: PaymentData, amount: f64) -> Result<PaymentData, RazorpayError> {
        let amount = to_minor_units(amount).ok_or_else(|| {
            RazorpayError::InvalidData("Refund amount must be greater than zero".to_string())
        })?;
        let payment_id = Self::payment_id(&data)?;
        let refund = self.client.refund_payment(&payment_id, amount).await?;
        info!("Refund {} created for Razorpay payment {}", refund.id, payment_id);

        Ok(merge(
            data,
            [
                ("refund_id", json!(refund.id)),
                ("refund_amount", json!(refund.amount)),
                ("refund_status", json!(refund.status)),
                ("refunded_at", json!(refund.created_at)),
            ],
        ))
    }

    /// Pending while no payment is attached or Razorpay cannot be reached.
    pub async fn status(&self, data: PaymentData) -> PaymentSessionStatus {
        let Some(payment_id) = data_str(&data, "razorpay_payment_id") else {
            return PaymentSessionStatus::Pending;
        };
        match self.client.fetch_payment(payment_id).await {
            Ok(payment) => map_payment_status(&payment.status),
            Err(e) => {
                warn!("Could not fetch Razorpay payment {}: {}", payment_id, e);
                PaymentSessionStatus::Pending
            }
        }
    }
}

impl PaymentProvider for RazorpayProviderService {
    type Error = RazorpayError;

    fn identifier(&self) -> &str {
        Self::IDENTIFIER
    }

    fn initiate_payment(
        &self,
        input: InitiatePaymentInput,
    ) -> BoxFuture<'_, InitiatePaymentOutput, Self::Error> {
        Box::pin(async move {
            self.create_order(input)
                .await
                .map_err(RazorpayError::during("Failed to create Razorpay order"))
        })
    }

    fn authorize_payment(
        &self,
        data: PaymentData,
        context: PaymentData,
    ) -> BoxFuture<'_, AuthorizePaymentOutput, Self::Error> {
        Box::pin(async move {
            self.authorize(data, context)
                .await
                .map_err(RazorpayError::during("Payment authorization failed"))
        })
    }

    fn update_payment(&self, data: PaymentData) -> BoxFuture<'_, PaymentData, Self::Error> {
        Box::pin(async move { Ok(data) })
    }

    fn capture_payment(&self, data: PaymentData) -> BoxFuture<'_, PaymentData, Self::Error> {
        Box::pin(async move {
            self.capture(data)
                .await
                .map_err(RazorpayError::during("Payment capture failed"))
        })
    }

    fn cancel_payment(&self, data: PaymentData) -> BoxFuture<'_, PaymentData, Self::Error> {
        Box::pin(async move {
            self.cancel(data)
                .await
                .map_err(RazorpayError::during("Payment cancellation failed"))
        })
    }

    // Razorpay orders expire on their own.
    fn delete_payment(&self, data: PaymentData) -> BoxFuture<'_, PaymentData, Self::Error> {
        Box::pin(async move { Ok(data) })
    }

    fn retrieve_payment(&self, data: PaymentData) -> BoxFuture<'_, PaymentData, Self::Error> {
        Box::pin(async move {
            self.retrieve(data)
                .await
                .map_err(RazorpayError::during("Failed to retrieve payment"))
        })
    }

    fn refund_payment(
        &self,
        data: PaymentData,
        amount: f64,
    ) -> BoxFuture<'_, PaymentData, Self::Error> {
        Box::pin(async move {
            self.refund(data, amount)
                .await
                .map_err(RazorpayError::during("Refund failed"))
        })
    }

    fn get_payment_status(
        &self,
        data: PaymentData,
    ) -> BoxFuture<'_, PaymentSessionStatus, Self::Error> {
        Box::pin(async move { Ok(self.status(data).await) })
    }

    /// Webhooks are handled by the `/webhooks/razorpay` route instead.
    fn get_webhook_action_and_data(
        &self,
        _payload: WebhookPayload,
    ) -> BoxFuture<'_, WebhookActionResult, Self::Error> {
        Box::pin(async move {
            Ok(WebhookActionResult {
                action: PaymentAction::NotSupported,
                data: None,
            })
        })
    }
}
