//! In-memory payment provider for tests.

use potli_common::models::{PaymentData, PaymentSessionStatus};
use potli_common::services::{
    AuthorizePaymentOutput, BoxFuture, BoxedError, InitiatePaymentInput, InitiatePaymentOutput,
    PaymentAction, PaymentProvider, WebhookActionResult, WebhookPayload,
};
use serde_json::{json, Value};
use std::sync::Mutex;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct MockProviderError(pub String);

fn fail(msg: &str) -> BoxedError {
    BoxedError::new(MockProviderError(msg.to_string()))
}

/// Records every call; authorizes when the context carries `"ok": true`.
pub struct MockPaymentProvider {
    pub calls: Mutex<Vec<String>>,
    pub status: Mutex<PaymentSessionStatus>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            status: Mutex::new(PaymentSessionStatus::Pending),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

fn with(mut data: PaymentData, key: &str, value: Value) -> PaymentData {
    data.insert(key.to_string(), value);
    data
}

impl PaymentProvider for MockPaymentProvider {
    type Error = BoxedError;

    fn identifier(&self) -> &str {
        "mock"
    }

    fn initiate_payment(
        &self,
        input: InitiatePaymentInput,
    ) -> BoxFuture<'_, InitiatePaymentOutput, Self::Error> {
        Box::pin(async move {
            self.record("initiate");
            if input.amount <= 0.0 {
                return Err(fail("Amount must be greater than zero"));
            }
            let data = with(input.data, "order_id", json!("order_mock"));
            let data = with(data, "cart_id", json!(input.context.cart_id));
            Ok(InitiatePaymentOutput {
                id: "order_mock".to_string(),
                status: PaymentSessionStatus::Pending,
                data,
            })
        })
    }

    fn authorize_payment(
        &self,
        data: PaymentData,
        context: PaymentData,
    ) -> BoxFuture<'_, AuthorizePaymentOutput, Self::Error> {
        Box::pin(async move {
            self.record("authorize");
            if context.get("ok") != Some(&json!(true)) {
                return Err(fail("Invalid payment signature"));
            }
            *self.status.lock().unwrap() = PaymentSessionStatus::Authorized;
            Ok(AuthorizePaymentOutput {
                status: PaymentSessionStatus::Authorized,
                data: with(data, "payment_id", json!("pay_mock")),
            })
        })
    }

    fn update_payment(&self, data: PaymentData) -> BoxFuture<'_, PaymentData, Self::Error> {
        Box::pin(async move { Ok(data) })
    }

    fn capture_payment(&self, data: PaymentData) -> BoxFuture<'_, PaymentData, Self::Error> {
        Box::pin(async move {
            self.record("capture");
            *self.status.lock().unwrap() = PaymentSessionStatus::Captured;
            Ok(with(data, "captured", json!(true)))
        })
    }

    fn cancel_payment(&self, data: PaymentData) -> BoxFuture<'_, PaymentData, Self::Error> {
        Box::pin(async move {
            self.record("cancel");
            Ok(with(data, "status", json!("canceled")))
        })
    }

    fn delete_payment(&self, data: PaymentData) -> BoxFuture<'_, PaymentData, Self::Error> {
        Box::pin(async move {
            self.record("delete");
            Ok(data)
        })
    }

    fn retrieve_payment(&self, data: PaymentData) -> BoxFuture<'_, PaymentData, Self::Error> {
        Box::pin(async move { Ok(data) })
    }

    fn refund_payment(
        &self,
        data: PaymentData,
        amount: f64,
    ) -> BoxFuture<'_, PaymentData, Self::Error> {
        Box::pin(async move {
            self.record("refund");
            Ok(with(data, "refund_amount", json!(amount as i64)))
        })
    }

    fn get_payment_status(
        &self,
        _data: PaymentData,
    ) -> BoxFuture<'_, PaymentSessionStatus, Self::Error> {
        Box::pin(async move { Ok(*self.status.lock().unwrap()) })
    }

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
