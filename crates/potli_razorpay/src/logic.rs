// --- File: crates/potli_razorpay/src/logic.rs ---
use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use potli_common::models::{PaymentData, PaymentSessionStatus};
use serde::Deserialize;
use serde_json::Value;
use sha2::Sha256;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

type HmacSha256 = Hmac<Sha256>;

/// Lower-case hex HMAC-SHA256 of `payload`.
pub fn hmac_sha256_hex(secret: &str, payload: &[u8]) -> String {
    // HMAC accepts keys of any length.
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

fn signature_matches(expected: &str, provided: &str) -> bool {
    !expected.is_empty() && constant_time_eq(expected.as_bytes(), provided.trim().as_bytes())
}

/// Checkout signature: HMAC of `"{order_id}|{payment_id}"` with the key secret.
pub fn verify_payment_signature(key_secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let expected = hmac_sha256_hex(key_secret, format!("{}|{}", order_id, payment_id).as_bytes());
    signature_matches(&expected, signature)
}

/// Webhook signature: HMAC of the raw request body with the webhook secret.
pub fn verify_webhook_signature(webhook_secret: &str, raw_body: &[u8], signature: &str) -> bool {
    signature_matches(&hmac_sha256_hex(webhook_secret, raw_body), signature)
}

/// Rounds to whole minor units; `None` unless the result is positive.
pub fn to_minor_units(amount: f64) -> Option<i64> {
    let rounded = amount.round();
    (rounded.is_finite() && rounded > 0.0).then_some(rounded as i64)
}

/// `receipt_{epoch_ms}_{random}`, under Razorpay's 40 character limit.
pub fn receipt(now_ms: i64, random: &str) -> String {
    format!("receipt_{}_{}", now_ms, random)
}

/// Razorpay payment status as a session status.
pub fn map_payment_status(status: &str) -> PaymentSessionStatus {
    match status {
        "authorized" => PaymentSessionStatus::Authorized,
        "captured" => PaymentSessionStatus::Captured,
        "refunded" => PaymentSessionStatus::Canceled,
        "failed" => PaymentSessionStatus::Error,
        _ => PaymentSessionStatus::Pending,
    }
}

/// Non-empty string field of session data or checkout context.
pub fn data_str<'a>(data: &'a PaymentData, key: &str) -> Option<&'a str> {
    data.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Copies `fields` over `data`.
pub fn merge(mut data: PaymentData, fields: impl IntoIterator<Item = (&'static str, Value)>) -> PaymentData {
    for (key, value) in fields {
        data.insert(key.to_string(), value);
    }
    data
}

// --- Webhooks ---

/// Events the webhook route acts on.
pub const HANDLED_EVENTS: [&str; 5] = [
    "payment.captured",
    "payment.failed",
    "payment.authorized",
    "refund.created",
    "refund.processed",
];

#[derive(Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct WebhookEvent {
    #[cfg_attr(feature = "openapi", schema(example = "payment.captured"))]
    pub event: Option<String>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub payload: Value,
}

impl WebhookEvent {
    /// Id of `payload.{kind}.entity`, e.g. the payment for `payment.*` events.
    pub fn entity_id(&self, kind: &str) -> Option<&str> {
        self.payload
            .get(kind)?
            .get("entity")?
            .get("id")?
            .as_str()
    }
}
